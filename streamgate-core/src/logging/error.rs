//! Logging errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    /// A global subscriber was already installed, or the filter was rejected
    #[error("failed to initialize logging: {0}")]
    InitializationFailed(String),

    #[error("invalid log level: {0}")]
    InvalidLevel(String),
}
