//! # clipboard: copying raw code samples out of the documentation
//!
//! The only external interaction of a code block is "copy to clipboard". This
//! module defines the [`Clipboard`] trait plus two implementations:
//!
//! - [`MemoryClipboard`]: in-process, used by tests and embedders.
//! - [`SystemClipboard`]: shells out to the platform clipboard tool
//!   (`pbcopy`, `wl-copy`, `xclip`, `xsel` or `clip`).
//!
//! ## Contract
//! After a successful `write_text(s)`, `read_text()` returns exactly `s`,
//! byte for byte. Implementations always receive the literal, un-annotated
//! source; never the highlighted HTML.
//!
//! ## Errors
//! Failures (no tool available, spawn failure, non-zero exit) are returned as
//! [`ClipboardError`] so callers can show them instead of a false "copied".

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStderr, Command};
use tokio::time::timeout;
use tracing::{debug, error, info};

const STDERR_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub enum ClipboardError {
    /// No supported clipboard tool was found on this system.
    Unavailable,
    Io(std::io::Error),
    /// The clipboard tool ran but exited unsuccessfully.
    CommandFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
    /// The clipboard held data that is not UTF-8 text.
    NotText,
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Unavailable => write!(f, "no supported clipboard tool found"),
            ClipboardError::Io(e) => write!(f, "clipboard I/O error: {e}"),
            ClipboardError::CommandFailed {
                program,
                status,
                stderr,
            } => {
                let status = status.map_or_else(|| "signal".to_string(), |code| code.to_string());
                write!(f, "clipboard command `{program}` failed (status {status})")?;
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
            ClipboardError::NotText => write!(f, "clipboard contents are not UTF-8 text"),
        }
    }
}

impl std::error::Error for ClipboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClipboardError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClipboardError {
    fn from(e: std::io::Error) -> Self {
        ClipboardError::Io(e)
    }
}

/// Write and read plain text on a clipboard.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Read the current clipboard contents.
    async fn read_text(&self) -> Result<String, ClipboardError>;
}

/// Clipboard held in process memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut contents = self.contents.lock().unwrap_or_else(|e| e.into_inner());
        contents.clear();
        contents.push_str(text);
        Ok(())
    }

    async fn read_text(&self) -> Result<String, ClipboardError> {
        let contents = self.contents.lock().unwrap_or_else(|e| e.into_inner());
        Ok(contents.clone())
    }
}

/// A program plus its fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ClipboardCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Clipboard backed by external platform tools.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    write: ClipboardCommand,
    read: ClipboardCommand,
}

impl SystemClipboard {
    /// Use explicit write/read commands. The write command receives the text
    /// on stdin; the read command must print the clipboard to stdout.
    pub fn with_commands(write: ClipboardCommand, read: ClipboardCommand) -> Self {
        Self { write, read }
    }

    /// Pick the first clipboard tool present on `PATH`.
    pub fn detect() -> Result<Self, ClipboardError> {
        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
        let candidates = [
            (
                ClipboardCommand::new("pbcopy", &[]),
                ClipboardCommand::new("pbpaste", &[]),
                true,
            ),
            (
                ClipboardCommand::new("wl-copy", &[]),
                ClipboardCommand::new("wl-paste", &["--no-newline"]),
                wayland,
            ),
            (
                ClipboardCommand::new("xclip", &["-selection", "clipboard"]),
                ClipboardCommand::new("xclip", &["-selection", "clipboard", "-o"]),
                true,
            ),
            (
                ClipboardCommand::new("xsel", &["--clipboard", "--input"]),
                ClipboardCommand::new("xsel", &["--clipboard", "--output"]),
                true,
            ),
            (
                ClipboardCommand::new("clip", &[]),
                ClipboardCommand::new("powershell", &["-NoProfile", "-Command", "Get-Clipboard -Raw"]),
                true,
            ),
        ];

        for (write, read, enabled) in candidates {
            if enabled && find_on_path(&write.program).is_some() {
                info!(program = %write.program, "Selected system clipboard tool");
                return Ok(Self { write, read });
            }
        }
        error!("No supported clipboard tool found on PATH");
        Err(ClipboardError::Unavailable)
    }

    pub fn write_command(&self) -> &ClipboardCommand {
        &self.write
    }

    pub fn read_command(&self) -> &ClipboardCommand {
        &self.read
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        debug!(program = %self.write.program, bytes = text.len(), "Writing to system clipboard");
        let mut child = Command::new(&self.write.program)
            .args(&self.write.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!(error = ?e, program = %self.write.program, "Failed to launch clipboard tool");
                ClipboardError::Io(e)
            })?;

        // xclip, xsel and wl-copy leave a process behind that keeps serving the
        // selection with our stderr inherited; never wait for EOF on it.
        let mut stderr = child.stderr.take();
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            let stderr = match stderr.as_mut() {
                Some(pipe) => drain_stderr(pipe).await,
                None => String::new(),
            };
            let err = ClipboardError::CommandFailed {
                program: self.write.program.clone(),
                status: status.code(),
                stderr,
            };
            error!(error = %err, "Clipboard write failed");
            return Err(err);
        }
        Ok(())
    }

    async fn read_text(&self) -> Result<String, ClipboardError> {
        let output = Command::new(&self.read.program)
            .args(&self.read.args)
            .stdin(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            return Err(ClipboardError::CommandFailed {
                program: self.read.program.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| ClipboardError::NotText)
    }
}

/// Collect what a failed tool wrote to stderr, giving up after
/// [`STDERR_GRACE`] if a leftover process still holds the pipe open.
async fn drain_stderr(pipe: &mut ChildStderr) -> String {
    let mut buf = Vec::new();
    if timeout(STDERR_GRACE, pipe.read_to_end(&mut buf)).await.is_err() {
        debug!("Clipboard tool stderr still open; keeping partial output");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn find_on_path(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        let exe = dir.join(format!("{program}.exe"));
        exe.is_file().then_some(exe)
    })
}
