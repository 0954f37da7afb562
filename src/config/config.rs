//! Engine-wide configuration.
//!
//! Settings are plain serde structures so they can be embedded in a host
//! application's own config file or loaded standalone from TOML.
//!
//! # Example TOML
//! ```toml
//! error_limit = 25
//! discriminator = "kind"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error cap used when neither the type nor the engine sets one
pub const DEFAULT_ERROR_LIMIT: usize = 10;

/// Field carrying the runtime type tag inside data
pub const DEFAULT_DISCRIMINATOR: &str = "_type";

/// Errors raised while setting up validation (never while validating)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Default per-scope and global error cap
    #[serde(default)]
    pub error_limit: Option<usize>,

    /// Discriminator field read by [`TypeRegistry`](crate::validators::TypeRegistry)
    #[serde(default = "default_discriminator")]
    pub discriminator: String,
}

fn default_discriminator() -> String {
    DEFAULT_DISCRIMINATOR.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            error_limit: None,
            discriminator: default_discriminator(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = Some(limit);
        self
    }

    /// Check settings for values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.error_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "error_limit must be greater than 0".to_string(),
            ));
        }
        if self.discriminator.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "discriminator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective limit for a scope: the type's own limit, then the engine's,
    /// then [`DEFAULT_ERROR_LIMIT`]. Zero counts as unset.
    pub fn resolve_error_limit(&self, type_limit: Option<usize>) -> usize {
        type_limit
            .filter(|limit| *limit > 0)
            .or(self.error_limit.filter(|limit| *limit > 0))
            .unwrap_or(DEFAULT_ERROR_LIMIT)
    }
}
