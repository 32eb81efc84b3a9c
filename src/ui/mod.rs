//! Terminal user interface for voicejot.
//!
//! One screen: waveform, record indicator, editable transcript, error line,
//! plus the once-per-launch onboarding overlay.

pub mod onboarding;
pub mod screen;

pub use screen::{MemoScreen, ScreenCommand, ScreenView};
