//! Configuration for the motiongate agent.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the gesture agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// User-facing shake sensitivity, 1 (least sensitive) to 10 (most).
    pub sensitivity: u8,

    /// Nominal accelerometer poll rate in Hz.
    pub sample_rate_hz: u32,

    /// IIO device name override; auto-detected when unset.
    pub device: Option<String>,

    /// Whether detection is currently paused.
    pub paused: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensitivity: 5,
            sample_rate_hz: 16,
            device: None,
            paused: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("motiongate")
            .join("config.json")
    }

    /// Sensitivity clamped to the supported 1..=10 range.
    pub fn clamped_sensitivity(&self) -> u8 {
        self.sensitivity.clamp(1, 10)
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sensitivity, 5);
        assert_eq!(config.sample_rate_hz, 16);
        assert!(config.device.is_none());
        assert!(!config.paused);
    }

    #[test]
    fn test_sensitivity_clamping() {
        let mut config = Config::default();

        config.sensitivity = 0;
        assert_eq!(config.clamped_sensitivity(), 1);

        config.sensitivity = 10;
        assert_eq!(config.clamped_sensitivity(), 10);

        config.sensitivity = 42;
        assert_eq!(config.clamped_sensitivity(), 10);
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config {
            sensitivity: 8,
            sample_rate_hz: 16,
            device: Some("bmc150_accel".to_string()),
            paused: true,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.sensitivity, 8);
        assert_eq!(parsed.device.as_deref(), Some("bmc150_accel"));
        assert!(parsed.paused);
    }
}
