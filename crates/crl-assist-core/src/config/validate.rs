//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.classifier.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "classifier.endpoint must not be empty".into(),
            ));
        }
        if self.classifier.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError(
                "classifier.timeout_ms must be > 0".into(),
            ));
        }
        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.endpoint must not be empty".into(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".into(),
            ));
        }
        if self.llm.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError(
                "llm.timeout_ms must be > 0".into(),
            ));
        }
        if self.upload.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "upload.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.upload.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "upload.supported_formats must list at least one extension".into(),
            ));
        }
        Ok(())
    }
}
