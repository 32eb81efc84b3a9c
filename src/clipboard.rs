//! Clipboard utilities for voicejot.
//!
//! Copies the transcript to the system clipboard using pbcopy (macOS),
//! wl-copy (Wayland), or xclip (X11). Clipboard availability is never fatal:
//! a missing tool logs a warning and the transcript stays on screen.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

/// Pipes `text` into the first available clipboard tool.
///
/// Copying the same text twice writes the same bytes twice; the call has no
/// state of its own.
///
/// # Errors
/// Never returns an error; an unavailable clipboard is logged only.
pub fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    let tools: &[(&str, &[&str])] = if cfg!(target_os = "macos") {
        &[("pbcopy", &[])]
    } else {
        &[
            ("wl-copy", &["--type", "text/plain", "--trim-newline"]),
            ("xclip", &["-selection", "clipboard", "-in", "-quiet"]),
        ]
    };

    for (tool, args) in tools {
        if pipe_to(tool, args, text) {
            tracing::debug!("Transcript copied to clipboard via {tool}");
            return Ok(());
        }
    }

    tracing::warn!("No clipboard tool available");
    Ok(())
}

/// Spawns `tool` and writes `text` to its stdin. Returns true on success.
fn pipe_to(tool: &str, args: &[&str], text: &str) -> bool {
    let Ok(mut child) = Command::new(tool).args(args).stdin(Stdio::piped()).spawn() else {
        tracing::debug!("{tool} not found or not executable");
        return false;
    };

    let Some(mut stdin) = child.stdin.take() else {
        return false;
    };

    match write!(stdin, "{text}") {
        Ok(()) => {
            drop(stdin);
            // Give the tool a moment to take ownership of the selection
            thread::sleep(Duration::from_millis(100));
            true
        }
        Err(e) => {
            tracing::warn!("Failed to write to {tool} stdin: {e}");
            false
        }
    }
}
