//! Application configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolutions offered by the resolution picker
pub const KNOWN_RESOLUTIONS: [&str; 8] = [
    "144p", "240p", "360p", "480p", "720p", "1080p", "1440p", "2160p",
];

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub download: DownloadConfig,
    pub tools: ToolsConfig,
    pub advanced: AdvancedConfig,
}

/// Download defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub default_resolution: String,
    /// Upper bound for fetching the stream catalog
    pub probe_timeout_seconds: u64,
}

/// External executables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ytdlp_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub audio_codec: String,
}

/// Advanced configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    pub log_level: String, // "error", "warn", "info", "debug", "trace"
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            default_resolution: "720p".to_string(),
            probe_timeout_seconds: 60,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            ffmpeg_path: None,
            audio_codec: "aac".to_string(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `config_path`, creating default if not exists
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config =
                Self::parse_object(&content).with_context(|| "Failed to parse config file")?;

            tracing::debug!("Loaded configuration from: {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load from `config_path` (or the default location) and validate
    pub fn load_checked(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = self.export()?;

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::debug!("Saved configuration to: {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "ytd", "ytd")
            .with_context(|| "Failed to get project directories")?;

        Ok(project_dirs.config_dir().join("config.json"))
    }

    /// Reset configuration at `config_path` to defaults
    pub fn reset(config_path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(config_path)?;
        tracing::info!("Reset configuration to defaults");
        Ok(config)
    }

    /// Export configuration as JSON string
    pub fn export(&self) -> Result<String> {
        serde_json::to_string_pretty(self).with_context(|| "Failed to export configuration")
    }

    /// Parse and validate configuration from a JSON string
    pub fn import(json: &str) -> Result<Self> {
        let config =
            Self::parse_object(json).with_context(|| "Failed to parse imported configuration")?;

        config
            .validate()
            .with_context(|| "Imported configuration is invalid")?;

        Ok(config)
    }

    /// Deserialize a JSON object. serde would otherwise accept a sequence
    /// for a struct and fill every field from defaults.
    fn parse_object(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            anyhow::bail!("configuration must be a JSON object");
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !crate::utils::is_valid_resolution(&self.download.default_resolution) {
            anyhow::bail!(
                "Invalid default resolution: {}",
                self.download.default_resolution
            );
        }

        if self.download.probe_timeout_seconds == 0 || self.download.probe_timeout_seconds > 600
        {
            anyhow::bail!("Probe timeout should be between 1 and 600 seconds");
        }

        if self.tools.audio_codec.trim().is_empty() {
            anyhow::bail!("Audio codec must not be empty");
        }

        if !LOG_LEVELS.contains(&self.advanced.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level: must be 'error', 'warn', 'info', 'debug', or 'trace'"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(KNOWN_RESOLUTIONS.contains(&config.download.default_resolution.as_str()));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = config.export().unwrap();
        let parsed_config = AppConfig::import(&json).unwrap();

        assert_eq!(config.export().unwrap(), parsed_config.export().unwrap());
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = AppConfig::default();
        config.download.default_resolution = "hd".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.download.probe_timeout_seconds = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.advanced.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.tools.audio_codec = " ".to_string();
        assert!(config.validate().is_err());
    }
}
