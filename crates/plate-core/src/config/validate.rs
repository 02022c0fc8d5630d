//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.input.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "input.supported_formats must not be empty".into(),
            ));
        }
        if self.primary.widths.is_empty() || self.primary.widths.contains(&0) {
            return Err(ConfigError::ValidationError(
                "primary.widths must be non-empty and all > 0".into(),
            ));
        }
        if self.thumbnail.sizes.is_empty() || self.thumbnail.sizes.contains(&0) {
            return Err(ConfigError::ValidationError(
                "thumbnail.sizes must be non-empty and all > 0".into(),
            ));
        }
        check_quality("primary.quality", self.primary.quality)?;
        check_quality("thumbnail.quality", self.thumbnail.quality)?;
        check_quality("heif.quality", self.heif.quality)?;
        if self.encoder.compression_level > 6 {
            return Err(ConfigError::ValidationError(
                "encoder.compression_level must be between 0 and 6".into(),
            ));
        }
        if self.encoder.program.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "encoder.program must not be empty".into(),
            ));
        }
        if self.heif.converters.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "heif.converters entries must not be empty".into(),
            ));
        }
        if self.output.thumbs_subdir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "output.thumbs_subdir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn check_quality(key: &str, value: u8) -> Result<(), ConfigError> {
    if value == 0 || value > 100 {
        return Err(ConfigError::ValidationError(format!(
            "{key} must be between 1 and 100"
        )));
    }
    Ok(())
}
