//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.server.max_upload_mb == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_upload_mb must be > 0".into(),
            ));
        }
        if self.image.max_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "image.max_dimension must be > 0".into(),
            ));
        }
        if self.image.jpeg_quality == 0 || self.image.jpeg_quality > 100 {
            return Err(ConfigError::ValidationError(
                "image.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.llm.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "llm.timeout_ms must be > 0".into(),
            ));
        }
        if self.llm.anthropic.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.anthropic.max_tokens must be > 0".into(),
            ));
        }
        if self.llm.openai.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.openai.max_tokens must be > 0".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_max_dimension() {
        let mut config = Config::default();
        config.image.max_dimension = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_dimension"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_quality() {
        let mut config = Config::default();
        config.image.jpeg_quality = 0;
        assert!(config.validate().is_err());

        config.image.jpeg_quality = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jpeg_quality"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.llm.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm.timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }
}
