//! Configuration file support for mapgesture.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/mapgesture/config.toml`.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

pub use types::InputConfig;

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [input]
/// click_duration_ms = 400
/// drag_duration_ms = 100
/// click_distance = 3.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Click, double click and drag thresholds
    #[serde(default)]
    pub input: InputConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `click_duration_ms`: 50 - 2000
    /// - `drag_duration_ms`: 0 - 2000
    /// - `click_distance`: 0.0 - 50.0
    pub fn validate_and_clamp(&mut self) {
        if !(50..=2000).contains(&self.input.click_duration_ms) {
            log::warn!(
                "Invalid click_duration_ms {}, clamping to 50-2000 range",
                self.input.click_duration_ms
            );
            self.input.click_duration_ms = self.input.click_duration_ms.clamp(50, 2000);
        }

        if self.input.drag_duration_ms > 2000 {
            log::warn!(
                "Invalid drag_duration_ms {}, clamping to 0-2000 range",
                self.input.drag_duration_ms
            );
            self.input.drag_duration_ms = 2000;
        }

        // NaN fails the range check too; clamp would keep it, so reset explicitly.
        if !(0.0..=50.0).contains(&self.input.click_distance) {
            log::warn!(
                "Invalid click_distance {:.1}, clamping to 0.0-50.0 range",
                self.input.click_distance
            );
            self.input.click_distance = if self.input.click_distance.is_nan() {
                types::InputConfig::default().click_distance
            } else {
                self.input.click_distance.clamp(0.0, 50.0)
            };
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("mapgesture");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the config to TOML and writes it to `config_path`,
    /// creating the parent directory if needed.
    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
