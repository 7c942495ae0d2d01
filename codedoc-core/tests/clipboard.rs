use codedoc_core::clipboard::{
    Clipboard, ClipboardCommand, ClipboardError, MemoryClipboard, SystemClipboard,
};
use codedoc_core::highlight::annotate;
use std::time::Duration;

const SAMPLE: &str = "async function load() {\n  return await fetch(\"/api?a=1&b=<2>\"); // ok\n}\n";

#[tokio::test]
async fn memory_clipboard_returns_exact_source() {
    let clipboard = MemoryClipboard::new();
    // Highlighting for display must not leak into what gets copied.
    let _display = annotate(SAMPLE).to_html();

    clipboard.write_text(SAMPLE).await.expect("write succeeds");
    let read = clipboard.read_text().await.expect("read succeeds");
    assert_eq!(read.as_bytes(), SAMPLE.as_bytes());
}

#[tokio::test]
async fn memory_clipboard_replaces_previous_contents() {
    let clipboard = MemoryClipboard::new();
    assert_eq!(clipboard.read_text().await.unwrap(), "");
    clipboard.write_text("first, longer value").await.unwrap();
    clipboard.write_text("second").await.unwrap();
    assert_eq!(clipboard.read_text().await.unwrap(), "second");
}

#[cfg(unix)]
#[tokio::test]
async fn system_clipboard_round_trips_through_commands() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("clipboard.txt");
    let store = store.to_str().unwrap();

    let clipboard = SystemClipboard::with_commands(
        ClipboardCommand::new("sh", &["-c", &format!("cat > '{store}'")]),
        ClipboardCommand::new("cat", &[store]),
    );

    clipboard.write_text(SAMPLE).await.expect("write succeeds");
    assert_eq!(clipboard.read_text().await.expect("read succeeds"), SAMPLE);
}

#[cfg(unix)]
#[tokio::test]
async fn system_clipboard_reports_failing_command() {
    let clipboard = SystemClipboard::with_commands(
        ClipboardCommand::new("sh", &["-c", "cat > /dev/null; echo denied >&2; exit 3"]),
        ClipboardCommand::new("sh", &["-c", "exit 1"]),
    );

    let err = clipboard.write_text("x").await.unwrap_err();
    match &err {
        ClipboardError::CommandFailed { program, status, stderr } => {
            assert_eq!(program, "sh");
            assert_eq!(*status, Some(3));
            assert!(stderr.contains("denied"));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
    assert!(err.to_string().contains("denied"));
    assert!(clipboard.read_text().await.is_err());
}

#[tokio::test]
async fn system_clipboard_reports_missing_program() {
    let clipboard = SystemClipboard::with_commands(
        ClipboardCommand::new("codedoc-no-such-clipboard-tool", &[]),
        ClipboardCommand::new("codedoc-no-such-clipboard-tool", &[]),
    );
    let err = clipboard.write_text("x").await.unwrap_err();
    assert!(matches!(err, ClipboardError::Io(_)), "got {err:?}");
}

#[cfg(unix)]
#[tokio::test]
async fn system_clipboard_write_returns_while_tool_daemon_keeps_running() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("clipboard.txt");
    let store = store.to_str().unwrap();

    // Mimics xclip: take the input, then leave a background process holding stderr.
    let clipboard = SystemClipboard::with_commands(
        ClipboardCommand::new("sh", &["-c", &format!("cat > '{store}'; sleep 30 &")]),
        ClipboardCommand::new("cat", &[store]),
    );

    let write = tokio::time::timeout(Duration::from_secs(5), clipboard.write_text(SAMPLE)).await;
    write
        .expect("write must not wait for the background process")
        .expect("write succeeds");
    assert_eq!(clipboard.read_text().await.unwrap(), SAMPLE);
}

#[cfg(unix)]
#[tokio::test]
async fn system_clipboard_failure_with_lingering_daemon_still_reports() {
    let clipboard = SystemClipboard::with_commands(
        ClipboardCommand::new("sh", &["-c", "cat > /dev/null; echo busy >&2; sleep 30 & exit 4"]),
        ClipboardCommand::new("sh", &["-c", "exit 1"]),
    );

    let err = tokio::time::timeout(Duration::from_secs(5), clipboard.write_text("x"))
        .await
        .expect("failure is reported promptly")
        .unwrap_err();
    match err {
        ClipboardError::CommandFailed { status, stderr, .. } => {
            assert_eq!(status, Some(4));
            assert!(stderr.contains("busy"), "got {stderr:?}");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}
