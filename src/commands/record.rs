//! The memo screen loop (default command).
//!
//! Wires the session controller, waveform sampler, and screen together in
//! one cooperative loop: poll input, check the auto-stop deadline, tick the
//! sampler, render. Transcription runs as a spawned task polled for
//! completion so the screen stays responsive.

use crate::clipboard::copy_to_clipboard;
use crate::config::VoicejotConfig;
use crate::feedback;
use crate::recording::AudioRecorder;
use crate::session::{SessionController, SessionStatus, SyntheticMagnitudes, WaveformSampler};
use crate::transcription::{self, TranscriptionError};
use crate::ui::screen::{FAILED_TO_START, FAILED_TO_TRANSCRIBE};
use crate::ui::{MemoScreen, ScreenCommand, ScreenView};
use std::time::Instant;
use tokio::task::JoinHandle;

type PendingTranscription = JoinHandle<Result<String, TranscriptionError>>;

/// Runs the single-screen memo pad until the user quits.
///
/// # Errors
/// - If configuration cannot be loaded or created
/// - If the terminal UI cannot be initialized
pub async fn handle_record() -> Result<(), anyhow::Error> {
    tracing::info!("=== voicejot memo screen started ===");

    let config = VoicejotConfig::load_or_init()?;
    tracing::info!(
        "Configuration loaded: device={}, sample_rate={}Hz, endpoint={}",
        config.audio.device,
        config.audio.sample_rate,
        config.transcription.endpoint
    );

    let recorder = AudioRecorder::new(config.audio.sample_rate, config.audio.device.clone());
    let mut controller = SessionController::new(recorder);
    let mut sampler = WaveformSampler::new(SyntheticMagnitudes::new());
    let mut screen = MemoScreen::new()?;

    // The single transient error line; the next failure overwrites it.
    let mut error_message: Option<&'static str> = None;
    let mut pending: Option<PendingTranscription> = None;

    loop {
        let now = Instant::now();

        if controller.auto_stop_due(now) {
            tracing::info!("Auto-stop: session cap reached");
            begin_transcription(&mut controller, &config, now, &mut pending, &mut error_message);
        }

        match screen.handle_input()? {
            ScreenCommand::Continue => {}
            ScreenCommand::ToggleRecording => match controller.status() {
                SessionStatus::Idle => match controller.start(now) {
                    Ok(()) => feedback::notify_success(),
                    Err(e) => {
                        tracing::error!("Failed to start recording: {e}");
                        error_message = Some(FAILED_TO_START);
                    }
                },
                SessionStatus::Recording => {
                    begin_transcription(
                        &mut controller,
                        &config,
                        now,
                        &mut pending,
                        &mut error_message,
                    );
                }
                SessionStatus::Transcribing => {
                    tracing::debug!("Toggle ignored while transcription is in flight");
                }
            },
            ScreenCommand::CopyTranscript => {
                copy_to_clipboard(screen.transcript())?;
                feedback::notify_success();
            }
            ScreenCommand::Quit => break,
        }

        // Collect a finished transcription without blocking the loop
        if let Some(task) = pending.take_if(|task| task.is_finished()) {
            controller.finish();
            match task.await {
                Ok(Ok(text)) => {
                    tracing::info!("Transcription completed: {} characters", text.len());
                    screen.set_transcript(text);
                }
                Ok(Err(e)) => {
                    tracing::error!("Transcription failed: {e}");
                    error_message = Some(FAILED_TO_TRANSCRIBE);
                }
                Err(e) => {
                    tracing::error!("Transcription task failed: {e}");
                    error_message = Some(FAILED_TO_TRANSCRIBE);
                }
            }
        }

        sampler.tick(now, controller.is_recording());

        screen.render(&ScreenView {
            status: controller.status(),
            magnitudes: sampler.magnitudes(),
            elapsed: controller.elapsed(now),
            error: error_message,
        })?;
    }

    screen.cleanup()?;
    tracing::info!("=== voicejot memo screen exited ===");
    Ok(())
}

/// Stops the active session and, if a recording came out of it, spawns the
/// transcription task. A stop failure surfaces on the error line; an
/// already-stopped session is a no-op.
fn begin_transcription(
    controller: &mut SessionController<AudioRecorder>,
    config: &VoicejotConfig,
    now: Instant,
    pending: &mut Option<PendingTranscription>,
    error_message: &mut Option<&'static str>,
) {
    match controller.stop(now) {
        Ok(Some(location)) => {
            let settings = config.transcription.clone();
            *pending = Some(tokio::spawn(async move {
                transcription::transcribe(&settings, &location).await
            }));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Stopping the session failed: {e}");
            *error_message = Some(FAILED_TO_TRANSCRIBE);
        }
    }
}
