//! Audio capture for voicejot.
//!
//! The session controller talks to the microphone through the
//! [`CaptureAdapter`] trait so tests can substitute a fake; [`AudioRecorder`]
//! is the cpal-backed implementation used by the application.

pub mod audio;

pub use audio::AudioRecorder;

use std::path::PathBuf;

/// Outcome of a microphone permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Platform microphone access, one recording at a time.
///
/// The adapter owns the live input stream while recording; that stream is the
/// opaque handle of an active session.
pub trait CaptureAdapter {
    /// Checks whether a usable input device is available.
    ///
    /// Returns [`Permission::Denied`] when no input device (or no input
    /// configuration) can be obtained, which is how a platform-level
    /// microphone denial surfaces here.
    ///
    /// # Errors
    /// - If the audio host cannot be queried at all
    fn request_permission(&mut self) -> anyhow::Result<Permission>;

    /// Opens the input stream and begins capturing samples.
    ///
    /// # Errors
    /// - If the device rejects the stream configuration
    fn start(&mut self) -> anyhow::Result<()>;

    /// Stops capturing and returns the location of the recorded artifact.
    ///
    /// # Errors
    /// - If no samples were captured
    /// - If the artifact cannot be written
    fn stop(&mut self) -> anyhow::Result<PathBuf>;
}
