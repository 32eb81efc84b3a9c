//! Recording session lifecycle.
//!
//! A session moves strictly Idle → Recording → (Idle | Transcribing) → Idle.
//! The controller owns the capture adapter, the armed auto-stop deadline, and
//! the precondition guards that make start/stop safe to call from any UI
//! state. Time enters through `Instant` parameters so tests drive the clock.

use crate::recording::{CaptureAdapter, Permission};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Hard cap on a single recording session. The auto-stop deadline is armed at
/// session start and fires a stop without user action.
pub const MAX_SESSION_DURATION: Duration = Duration::from_secs(60);

/// Lifecycle state of the recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No session; the transcript is editable and a new session may start.
    Idle,
    /// Microphone open, samples being captured.
    Recording,
    /// Recording stopped, transcription request in flight.
    Transcribing,
}

/// Recoverable failures on the start/stop path.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No usable input device; the platform analog of a denied microphone
    /// permission prompt.
    #[error("microphone permission denied")]
    PermissionDenied,
    /// The capture adapter failed to start or stop.
    #[error("audio capture failed: {0}")]
    Capture(#[source] anyhow::Error),
}

/// Owns the session state machine and its capture adapter.
pub struct SessionController<A: CaptureAdapter> {
    adapter: A,
    status: SessionStatus,
    started_at: Option<Instant>,
    auto_stop_at: Option<Instant>,
    max_duration: Duration,
}

impl<A: CaptureAdapter> SessionController<A> {
    /// Creates an idle controller with the standard 60-second cap.
    pub fn new(adapter: A) -> Self {
        Self::with_max_duration(adapter, MAX_SESSION_DURATION)
    }

    /// Creates an idle controller with a custom cap.
    pub fn with_max_duration(adapter: A, max_duration: Duration) -> Self {
        Self {
            adapter,
            status: SessionStatus::Idle,
            started_at: None,
            auto_stop_at: None,
            max_duration,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_recording(&self) -> bool {
        self.status == SessionStatus::Recording
    }

    /// Time recorded so far; zero outside an active session.
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|t| now.duration_since(t))
            .unwrap_or_default()
    }

    /// Starts a new session.
    ///
    /// Guarded no-op unless the controller is Idle. A permission denial
    /// leaves the controller Idle and untouched. On success the controller
    /// is Recording with the auto-stop deadline armed at `now + cap`.
    ///
    /// # Errors
    /// - [`SessionError::PermissionDenied`] if no input device is usable
    /// - [`SessionError::Capture`] if the input stream cannot be opened
    pub fn start(&mut self, now: Instant) -> Result<(), SessionError> {
        if self.status != SessionStatus::Idle {
            tracing::debug!(status = ?self.status, "start ignored: session already active");
            return Ok(());
        }

        match self
            .adapter
            .request_permission()
            .map_err(SessionError::Capture)?
        {
            Permission::Granted => {}
            Permission::Denied => {
                tracing::warn!("microphone permission denied");
                return Err(SessionError::PermissionDenied);
            }
        }

        self.adapter.start().map_err(SessionError::Capture)?;

        self.status = SessionStatus::Recording;
        self.started_at = Some(now);
        self.auto_stop_at = Some(now + self.max_duration);
        tracing::info!("recording session started");
        Ok(())
    }

    /// True when the armed auto-stop deadline has passed. Only meaningful
    /// while Recording; the deadline is disarmed on every stop, so this can
    /// trigger at most one stop per session.
    pub fn auto_stop_due(&self, now: Instant) -> bool {
        self.status == SessionStatus::Recording
            && self.auto_stop_at.is_some_and(|deadline| now >= deadline)
    }

    /// Stops the active session.
    ///
    /// Idempotent no-op (`Ok(None)`) unless the controller is Recording.
    /// Disarms the auto-stop, releases the capture handle, and transitions
    /// to Transcribing, returning the recorded artifact's location. If the
    /// adapter fails to stop, the session falls back to Idle.
    ///
    /// # Errors
    /// - [`SessionError::Capture`] if the adapter fails to stop or save
    pub fn stop(&mut self, now: Instant) -> Result<Option<PathBuf>, SessionError> {
        if self.status != SessionStatus::Recording {
            tracing::debug!(status = ?self.status, "stop ignored: no active recording");
            return Ok(None);
        }

        let duration = self.elapsed(now);
        self.auto_stop_at = None;
        self.started_at = None;

        match self.adapter.stop() {
            Ok(location) => {
                self.status = SessionStatus::Transcribing;
                tracing::info!(
                    "recording session stopped after {:.1}s: {}",
                    duration.as_secs_f32(),
                    location.display()
                );
                Ok(Some(location))
            }
            Err(e) => {
                self.status = SessionStatus::Idle;
                tracing::error!("failed to stop recording: {e}");
                Err(SessionError::Capture(e))
            }
        }
    }

    /// Completes the transcription phase, returning to Idle. No-op from any
    /// other state, so the Transcribing → Idle edge is the only way out.
    pub fn finish(&mut self) {
        if self.status == SessionStatus::Transcribing {
            self.status = SessionStatus::Idle;
            tracing::debug!("session returned to idle");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::waveform::{MagnitudeSource, WaveformSampler};
    use anyhow::anyhow;

    /// Scriptable capture adapter recording how it was driven.
    struct FakeAdapter {
        permission: Permission,
        fail_stop: bool,
        starts: u32,
        stops: u32,
    }

    impl FakeAdapter {
        fn granting() -> Self {
            Self {
                permission: Permission::Granted,
                fail_stop: false,
                starts: 0,
                stops: 0,
            }
        }

        fn denying() -> Self {
            Self {
                permission: Permission::Denied,
                ..Self::granting()
            }
        }
    }

    impl CaptureAdapter for FakeAdapter {
        fn request_permission(&mut self) -> anyhow::Result<Permission> {
            Ok(self.permission)
        }

        fn start(&mut self) -> anyhow::Result<()> {
            self.starts += 1;
            Ok(())
        }

        fn stop(&mut self) -> anyhow::Result<PathBuf> {
            self.stops += 1;
            if self.fail_stop {
                Err(anyhow!("stream gone"))
            } else {
                Ok(PathBuf::from("/tmp/voicejot-recording.wav"))
            }
        }
    }

    struct Steady;

    impl MagnitudeSource for Steady {
        fn next_magnitude(&mut self) -> u64 {
            42
        }
    }

    #[test]
    fn start_records_and_arms_auto_stop() {
        let mut ctl = SessionController::new(FakeAdapter::granting());
        let t0 = Instant::now();

        ctl.start(t0).unwrap();
        assert_eq!(ctl.status(), SessionStatus::Recording);
        assert!(!ctl.auto_stop_due(t0 + Duration::from_secs(59)));
        assert!(ctl.auto_stop_due(t0 + MAX_SESSION_DURATION));
    }

    #[test]
    fn permission_denied_leaves_idle_and_adapter_untouched() {
        let mut ctl = SessionController::new(FakeAdapter::denying());
        let t0 = Instant::now();

        let err = ctl.start(t0).unwrap_err();
        assert!(matches!(err, SessionError::PermissionDenied));
        assert_eq!(ctl.status(), SessionStatus::Idle);
        assert_eq!(ctl.adapter.starts, 0);
        assert!(!ctl.auto_stop_due(t0 + MAX_SESSION_DURATION));
    }

    #[test]
    fn stop_without_active_session_is_noop() {
        let mut ctl = SessionController::new(FakeAdapter::granting());
        let t0 = Instant::now();

        assert!(ctl.stop(t0).unwrap().is_none());
        assert_eq!(ctl.status(), SessionStatus::Idle);
        assert_eq!(ctl.adapter.stops, 0);
    }

    #[test]
    fn manual_stop_disarms_auto_stop_and_yields_location() {
        let mut ctl = SessionController::new(FakeAdapter::granting());
        let t0 = Instant::now();

        ctl.start(t0).unwrap();
        let location = ctl.stop(t0 + Duration::from_secs(10)).unwrap();
        assert!(location.is_some());
        assert_eq!(ctl.status(), SessionStatus::Transcribing);
        assert_eq!(ctl.adapter.stops, 1);
        // The deadline armed at start must not fire after a manual stop.
        assert!(!ctl.auto_stop_due(t0 + Duration::from_secs(61)));
    }

    #[test]
    fn auto_stop_fires_exactly_once() {
        let mut ctl = SessionController::new(FakeAdapter::granting());
        let t0 = Instant::now();
        let past_deadline = t0 + Duration::from_secs(61);

        ctl.start(t0).unwrap();
        assert!(ctl.auto_stop_due(past_deadline));
        ctl.stop(past_deadline).unwrap();

        assert!(!ctl.auto_stop_due(past_deadline + Duration::from_secs(60)));
        assert_eq!(ctl.adapter.stops, 1);

        // A second stop is the guarded no-op, not a double release.
        assert!(ctl.stop(past_deadline).unwrap().is_none());
        assert_eq!(ctl.adapter.stops, 1);
    }

    #[test]
    fn transcribing_returns_to_idle_only_via_finish() {
        let mut ctl = SessionController::new(FakeAdapter::granting());
        let t0 = Instant::now();

        ctl.start(t0).unwrap();
        ctl.stop(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(ctl.status(), SessionStatus::Transcribing);

        // start is guarded while a transcription is in flight
        ctl.start(t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(ctl.status(), SessionStatus::Transcribing);
        assert_eq!(ctl.adapter.starts, 1);

        ctl.finish();
        assert_eq!(ctl.status(), SessionStatus::Idle);

        // finish outside Transcribing changes nothing
        ctl.finish();
        assert_eq!(ctl.status(), SessionStatus::Idle);
    }

    #[test]
    fn failed_adapter_stop_falls_back_to_idle() {
        let mut adapter = FakeAdapter::granting();
        adapter.fail_stop = true;
        let mut ctl = SessionController::new(adapter);
        let t0 = Instant::now();

        ctl.start(t0).unwrap();
        let err = ctl.stop(t0 + Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, SessionError::Capture(_)));
        assert_eq!(ctl.status(), SessionStatus::Idle);
        assert!(!ctl.auto_stop_due(t0 + Duration::from_secs(61)));
    }

    #[test]
    fn elapsed_is_zero_outside_an_active_session() {
        let mut ctl = SessionController::new(FakeAdapter::granting());
        let t0 = Instant::now();

        assert_eq!(ctl.elapsed(t0), Duration::ZERO);
        ctl.start(t0).unwrap();
        assert_eq!(ctl.elapsed(t0 + Duration::from_secs(3)), Duration::from_secs(3));
        ctl.stop(t0 + Duration::from_secs(3)).unwrap();
        assert_eq!(ctl.elapsed(t0 + Duration::from_secs(4)), Duration::ZERO);
    }

    #[test]
    fn waveform_buffer_empty_whenever_not_recording() {
        let mut ctl = SessionController::new(FakeAdapter::granting());
        let mut sampler = WaveformSampler::new(Steady);
        let t0 = Instant::now();

        sampler.tick(t0, ctl.is_recording());
        assert!(sampler.magnitudes().is_empty());

        ctl.start(t0).unwrap();
        for i in 1..=5u64 {
            sampler.tick(t0 + Duration::from_millis(100 * i), ctl.is_recording());
        }
        assert!(!sampler.magnitudes().is_empty());

        ctl.stop(t0 + Duration::from_secs(1)).unwrap();
        sampler.tick(t0 + Duration::from_millis(1100), ctl.is_recording());
        assert!(sampler.magnitudes().is_empty());

        ctl.finish();
        sampler.tick(t0 + Duration::from_millis(1200), ctl.is_recording());
        assert!(sampler.magnitudes().is_empty());
    }
}
