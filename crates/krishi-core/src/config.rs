use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{KrishiError, Result};

/// Top-level configuration for the Krishi service.
///
/// Loaded from `~/.krishi/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KrishiConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

impl KrishiConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: KrishiConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| KrishiError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding model and codec artifacts.
    pub models_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// API server port.
    pub port: u16,
    /// Maximum API requests per second before throttling.
    pub rate_limit_per_sec: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            models_dir: "~/.krishi/models".to_string(),
            log_level: "info".to_string(),
            port: 3030,
            rate_limit_per_sec: 100,
        }
    }
}

/// Chat engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Whether the chat engine accepts messages.
    pub enabled: bool,
    /// Session timeout in minutes; idle sessions past this are replaced.
    pub session_timeout_minutes: u32,
    /// Maximum utterance length in characters.
    pub max_message_length: usize,
    /// Minimum similarity score (0-100) for a vocabulary label to count as
    /// extracted from the utterance.
    pub match_threshold: u8,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_timeout_minutes: 30,
            max_message_length: 2000,
            match_threshold: 50,
        }
    }
}

/// Default numeric model inputs used when no live measurements exist.
///
/// The groundwater model was trained on sensor features this service does
/// not collect per request, so these stand in for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Ambient temperature in Celsius.
    pub temperature: f64,
    /// Relative humidity percentage.
    pub humidity: f64,
    /// Soil pH.
    pub ph: f64,
    /// Baseline groundwater level in meters, fed to the crop model.
    pub groundwater_level: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            temperature: 30.0,
            humidity: 60.0,
            ph: 6.5,
            groundwater_level: 10.0,
        }
    }
}
