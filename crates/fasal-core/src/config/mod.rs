//! Configuration management for FasalRakshak.
//!
//! Configuration is loaded from a TOML file in the platform config directory
//! (or an explicit path), then a handful of environment variables are applied
//! on top. The result is read once at startup and never mutated afterwards.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Image normalization settings
    pub image: ImageConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration (plus environment overrides) if the
    /// file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Load configuration from an explicit path, or the default location when `None`.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load with an explicit environment lookup for the overrides.
    fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::parse_file(path)?,
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::parse_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(Some(path))
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// - `USE_CLAUDE`: `"true"` (any case) prefers Anthropic, anything else disables it
    /// - `FASAL_HOST`: server bind address
    /// - `FASAL_PORT`: server port (ignored if not a valid port number)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("USE_CLAUDE") {
            self.llm.prefer_anthropic = value.trim().eq_ignore_ascii_case("true");
        }
        if let Some(host) = lookup("FASAL_HOST") {
            if !host.trim().is_empty() {
                self.server.host = host.trim().to_string();
            }
        }
        if let Some(port) = lookup("FASAL_PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid FASAL_PORT value '{port}'"),
            }
        }
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/in.fasalrakshak.fasal/config.toml
    /// - Linux: ~/.config/fasal/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\fasalrakshak\fasal\config\config.toml
    ///
    /// Falls back to ~/.fasal/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("in", "fasalrakshak", "fasal")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let expanded = shellexpand::tilde("~/.fasal/config.toml");
                PathBuf::from(expanded.into_owned())
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
