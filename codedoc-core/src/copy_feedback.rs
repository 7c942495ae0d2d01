//! Transient "copied" confirmation for a code block's copy button.
//!
//! A successful copy sets the flag and schedules a single reset after the
//! reset window. Copying again before the reset fires cancels the pending
//! reset and starts a new one, so the flag always clears relative to the most
//! recent copy.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::clipboard::{Clipboard, ClipboardError};

pub const DEFAULT_RESET_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
struct FeedbackState {
    copied: bool,
    // Bumped on every copy; a reset only applies to the copy that scheduled it.
    generation: u64,
}

#[derive(Debug)]
pub struct CopyFeedback {
    state: Arc<Mutex<FeedbackState>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    reset_window: Duration,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::with_reset_window(DEFAULT_RESET_WINDOW)
    }

    pub fn with_reset_window(reset_window: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(FeedbackState::default())),
            pending: Mutex::new(None),
            reset_window,
        }
    }

    pub fn reset_window(&self) -> Duration {
        self.reset_window
    }

    pub fn is_copied(&self) -> bool {
        lock(&*self.state).copied
    }

    /// Whether a reset is scheduled and has not run yet.
    pub fn has_pending_reset(&self) -> bool {
        lock(&self.pending)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Copy the raw `source` to `clipboard` and raise the "copied" flag.
    ///
    /// On failure the flag is left untouched and the clipboard error is
    /// returned. Must be called from within a tokio runtime.
    pub async fn copy<C>(&self, clipboard: &C, source: &str) -> Result<(), ClipboardError>
    where
        C: Clipboard + ?Sized,
    {
        if let Err(e) = clipboard.write_text(source).await {
            error!(error = %e, bytes = source.len(), "Copy to clipboard failed");
            return Err(e);
        }
        self.mark_copied();
        debug!(bytes = source.len(), window_ms = self.reset_window.as_millis() as u64, "Copied source to clipboard");
        Ok(())
    }

    fn mark_copied(&self) {
        let generation = {
            let mut state = lock(&*self.state);
            state.copied = true;
            state.generation += 1;
            state.generation
        };

        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.take() {
            previous.abort();
            debug!("Cancelled pending copy reset");
        }

        let state = Arc::clone(&self.state);
        let window = self.reset_window;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut guard = lock(&*state);
            if guard.generation == generation {
                guard.copied = false;
            }
        }));
    }
}

impl Drop for CopyFeedback {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.pending).take() {
            handle.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
