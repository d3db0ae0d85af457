//! Error types for the FasalRakshak diagnosis relay.
//!
//! Errors are split by concern: configuration problems surface at startup,
//! diagnosis problems surface per request and carry enough context for the
//! HTTP layer to pick a status code.

use thiserror::Error;

/// Top-level error type for FasalRakshak operations.
#[derive(Error, Debug)]
pub enum FasalError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Per-request diagnosis errors
    #[error("{0}")]
    Diagnosis(#[from] DiagnosisError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures of a single diagnose call.
///
/// Every variant is local to one request. Nothing is retried or queued.
#[derive(Error, Debug)]
pub enum DiagnosisError {
    /// Upload bytes could not be decoded as an image
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Neither provider credential resolved at startup
    #[error("No AI API key configured. Please set ANTHROPIC_API_KEY or OPENAI_API_KEY")]
    NoProviderConfigured,

    /// The remote provider call failed (transport, auth, quota, malformed reply)
    #[error("{provider} API error: {message}")]
    Provider {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Anything else that went wrong while orchestrating the call
    #[error("Diagnosis failed: {0}")]
    Internal(String),
}

impl DiagnosisError {
    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DiagnosisError::InvalidImage(_))
    }
}

/// Convenience type alias for FasalRakshak results.
pub type Result<T> = std::result::Result<T, FasalError>;

/// Convenience type alias for diagnosis results.
pub type DiagnosisResult<T> = std::result::Result<T, DiagnosisError>;
