//! Configuration file management for voicejot.
//!
//! Loads and saves application configuration from a TOML file in the user's
//! config directory, writing the defaults on first run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Audio recording configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `voicejot list-devices`
    /// - device name from `voicejot list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Recording sample rate hint in Hz; the device's native rate wins.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            sample_rate: default_sample_rate(),
        }
    }
}

/// Remote transcription endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Chat-completion endpoint the recording location is posted to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model name sent in the request body.
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_endpoint() -> String {
    "https://api.voicejot.app/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "voicejot-transcribe-1".to_string()
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoicejotConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub transcription: TranscriptionSettings,
}

impl VoicejotConfig {
    /// Loads the configuration, creating the file with defaults if missing.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be read or written
    /// - If the TOML is malformed
    pub fn load_or_init() -> anyhow::Result<Self> {
        let config_path = config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            tracing::info!("Default configuration written: {}", config_path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(&config_path)?;
        let config: VoicejotConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = config_path()?;
        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Retrieves the path to the config file, creating the directory if needed.
pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    let config_dir = home.join(".config").join("voicejot");

    fs::create_dir_all(&config_dir)?;

    Ok(config_dir.join("voicejot.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_missing_sections() {
        let config: VoicejotConfig = toml::from_str("").unwrap();
        assert_eq!(config.audio.device, "default");
        assert_eq!(config.audio.sample_rate, 16000);
        assert!(config.transcription.endpoint.starts_with("https://"));
        assert!(!config.transcription.model.is_empty());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = VoicejotConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: VoicejotConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.audio.device, config.audio.device);
        assert_eq!(parsed.transcription.endpoint, config.transcription.endpoint);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: VoicejotConfig = toml::from_str(
            r#"
            [transcription]
            model = "custom-model"
            "#,
        )
        .unwrap();
        assert_eq!(config.transcription.model, "custom-model");
        assert!(config.transcription.endpoint.starts_with("https://"));
        assert_eq!(config.audio.device, "default");
    }
}
