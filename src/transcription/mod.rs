//! Transcription service for audio-to-text conversion.
//!
//! One-shot client for the remote chat-completion endpoint that performs
//! transcription. The whole surface is a single `transcribe` call; there is
//! no retry, no streaming, and no provider selection.

pub mod api;

pub use api::{transcribe, TranscriptionError};
