//! Codec configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via SSB_RPC_CONFIG)
//! 3. Environment variables

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the YAML config file.
pub const CONFIG_ENV: &str = "SSB_RPC_CONFIG";

/// Environment variable overriding [`CodecConfig::max_body_len`].
pub const MAX_BODY_LEN_ENV: &str = "SSB_RPC_MAX_BODY_LEN";

/// Limits applied while encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest body accepted, in bytes. Capped by the 4-byte length field.
    pub max_body_len: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_body_len: u32::MAX,
        }
    }
}

impl CodecConfig {
    /// Loads configuration from file, then applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: CodecConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(max) = std::env::var(MAX_BODY_LEN_ENV) {
            match max.parse() {
                Ok(n) => self.max_body_len = n,
                Err(_) => tracing::warn!(value = %max, "ignoring invalid {}", MAX_BODY_LEN_ENV),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_len == 0 {
            return Err(ConfigError::Invalid("max_body_len must be > 0".into()));
        }
        Ok(())
    }
}
