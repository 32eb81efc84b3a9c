//! Configuration management for voicejot.
//!
//! Configuration lives in a TOML file in the user's config directory and is
//! created with defaults on first run. There are no credentials to manage;
//! the transcription endpoint is unauthenticated.

pub mod file;

pub use file::{AudioConfig, TranscriptionSettings, VoicejotConfig};
