//! Success cue for voicejot.
//!
//! A fire-and-forget terminal bell, emitted when a recording session starts
//! and when the transcript is copied. The result is never consumed: a
//! terminal with the bell disabled simply stays quiet.

use std::io::{self, Write};

/// Emits the success cue. Never fails.
pub fn notify_success() {
    let mut out = io::stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}
