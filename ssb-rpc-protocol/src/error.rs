//! Protocol error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while encoding a frame.
///
/// Every variant is produced before any bytes are written, so a failed call
/// never yields a partial frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid request number: {0} (must be >= 1)")]
    InvalidRequestNumber(i32),

    #[error("body too large: {size} bytes (max {max})")]
    BodyTooLarge { size: usize, max: u32 },
}

impl ProtocolError {
    /// Returns true if the error was caused by a caller-supplied argument
    /// rather than by the size of the body.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ProtocolError::InvalidRequestNumber(_))
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    IoError(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
