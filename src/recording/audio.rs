//! Microphone capture via cpal.
//!
//! Captures PCM samples from a configured or default input device, converts
//! multi-channel audio to mono by averaging channels, and saves the session
//! artifact as a 16-bit mono WAV in the temp directory.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hound::WavWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{CaptureAdapter, Permission};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// cpal-backed [`CaptureAdapter`].
///
/// Captures at the device's native sample rate; the rate requested in
/// configuration is a hint only. Holds the input stream for the duration of
/// a session — dropping the stream is what releases the microphone.
pub struct AudioRecorder {
    /// Actual recording sample rate from device
    sample_rate: u32,
    /// Recorded audio samples (i16 PCM mono)
    samples: Arc<Mutex<Vec<i16>>>,
    /// Active audio input stream (kept alive during recording)
    stream: Option<cpal::Stream>,
    /// Device name or "default" to use the system default device
    device_name: String,
}

impl AudioRecorder {
    /// Creates a recorder for the given device and requested sample rate.
    ///
    /// Use "default" as the device name for the system default input.
    pub fn new(requested_sample_rate: u32, device_name: String) -> Self {
        Self {
            sample_rate: requested_sample_rate,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            device_name,
        }
    }

    /// Looks up the configured input device.
    fn resolve_device(&self) -> Result<cpal::Device> {
        suppress_alsa_warnings(|| {
            let host = cpal::default_host();
            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or_else(|| anyhow!("No audio input device available"))
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })
    }

    /// Appends incoming audio data as mono samples.
    fn handle_audio_callback(
        data: &[i16],
        samples_arc: &Arc<Mutex<Vec<i16>>>,
        num_channels: usize,
    ) {
        let mut samples = samples_arc.lock().unwrap();

        match num_channels {
            1 => {
                samples.extend_from_slice(data);
            }
            2 => {
                for chunk in data.chunks_exact(2) {
                    let left = chunk[0] as i32;
                    let right = chunk[1] as i32;
                    samples.push(((left + right) / 2) as i16);
                }
            }
            _ => {
                for chunk in data.chunks_exact(num_channels) {
                    let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                    samples.push((sum / num_channels as i32) as i16);
                }
            }
        }
    }

    /// Writes the captured samples as a 16-bit mono WAV.
    fn save_wav(&self, samples: &[i16], path: &Path) -> Result<()> {
        let wav_spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, wav_spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        tracing::debug!("Recording saved: {}", path.display());
        Ok(())
    }

    /// Artifact path for the current process. A new recording overwrites the
    /// previous one; there is no recording history.
    fn artifact_path(&self) -> PathBuf {
        std::env::temp_dir().join(format!("voicejot-{}.wav", std::process::id()))
    }
}

impl CaptureAdapter for AudioRecorder {
    fn request_permission(&mut self) -> Result<Permission> {
        let available = suppress_alsa_warnings(|| {
            let host = cpal::default_host();
            let device = if self.device_name == "default" {
                host.default_input_device()
            } else {
                find_device_by_name(&host, &self.device_name).ok()
            };
            Ok(device.and_then(|d| d.default_input_config().ok()).is_some())
        })?;

        if available {
            Ok(Permission::Granted)
        } else {
            Ok(Permission::Denied)
        }
    }

    fn start(&mut self) -> Result<()> {
        let device = self.resolve_device()?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Recording device: {}", device_name);

        let device_config = device.default_input_config()?;
        let device_sample_rate = device_config.sample_rate().0;
        let num_channels = device_config.channels() as usize;

        if device_sample_rate != self.sample_rate {
            tracing::warn!(
                "Requested sample rate {}Hz but device uses {}Hz. Recording at device rate.",
                self.sample_rate,
                device_sample_rate
            );
        }
        self.sample_rate = device_sample_rate;

        // Fresh session, fresh buffer
        self.samples.lock().unwrap().clear();

        let samples_arc = Arc::clone(&self.samples);
        let stream = device.build_input_stream(
            &device_config.into(),
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                Self::handle_audio_callback(data, &samples_arc, num_channels);
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )?;

        stream.play()?;
        self.stream = Some(stream);

        tracing::debug!("Audio stream started ({device_sample_rate}Hz, {num_channels} channels)");
        Ok(())
    }

    fn stop(&mut self) -> Result<PathBuf> {
        // Dropping the stream releases the microphone
        self.stream = None;

        let samples = self.samples.lock().unwrap().clone();
        if samples.is_empty() {
            return Err(anyhow!("Recording stopped with no samples captured"));
        }

        let duration_secs = samples.len() as f32 / self.sample_rate as f32;
        tracing::info!(
            "Recording stopped: {:.2}s ({} samples at {}Hz)",
            duration_secs,
            samples.len(),
            self.sample_rate
        );

        let path = self.artifact_path();
        self.save_wav(&samples, &path)?;
        Ok(path)
    }
}

/// Finds an audio input device by name or numeric index.
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    if let Ok(index) = device_spec.parse::<usize>() {
        let devices: Vec<_> = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
            .collect();

        let count = devices.len();
        return devices.into_iter().nth(index).ok_or_else(|| {
            anyhow!(
                "Device index {} is out of range (0-{})",
                index,
                count.saturating_sub(1)
            )
        });
    }

    let devices = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?;

    for device in devices {
        if let Ok(name) = device.name() {
            if name == device_spec {
                return Ok(device);
            }
        }
    }

    Err(anyhow!(
        "Audio input device '{device_spec}' not found. Use 'voicejot list-devices' to see available devices."
    ))
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
#[cfg(target_os = "linux")]
fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// On non-Linux platforms, no stderr suppression is needed since ALSA doesn't exist.
#[cfg(not(target_os = "linux"))]
fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}
