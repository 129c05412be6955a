//! Error types for board configuration, rendering and export.

use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum GobanError {
    /// A parameter was rejected when the configuration was built
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A config file or preset could not be parsed
    #[error("Failed to parse board config: {0}")]
    Parse(String),

    /// PNG or PDF conversion failed
    #[error("Export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GobanError>;

pub(crate) fn invalid(message: impl Into<String>) -> GobanError {
    GobanError::InvalidConfiguration(message.into())
}
