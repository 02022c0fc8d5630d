//! Configuration management for plate.
//!
//! Configuration is loaded from the platform config directory with defaults
//! matching the site's derivative conventions. Every section implements
//! `Default`, so an absent file or a partial file both work.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for plate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source scanning settings
    pub input: InputConfig,

    /// Output layout settings
    pub output: OutputConfig,

    /// Primary derivative settings
    pub primary: PrimaryConfig,

    /// Thumbnail derivative settings
    pub thumbnail: ThumbnailConfig,

    /// Encoder settings
    pub encoder: EncoderConfig,

    /// HEIC/HEIF conversion settings
    pub heif: HeifConfig,

    /// Failure handling
    pub processing: ProcessingConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.plate.plate/config.toml
    /// - Linux: ~/.config/plate/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\plate\config\config.toml
    ///
    /// Falls back to ~/.plate/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "plate", "plate")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".plate").join("config.toml")
            })
    }

    /// Default input directory (with ~ expansion).
    pub fn input_dir(&self) -> PathBuf {
        expand(&self.input.dir)
    }

    /// Default output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        expand(&self.output.dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}
