//! Error types for session orchestration

use thiserror::Error;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Procedure or calibration error from the core
    #[error(transparent)]
    Hearing(#[from] hearing_core::HearingError),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// The stimulus device could not be initialised
    #[error("Stimulus device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Operation not valid in the current session state
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// Report serialisation failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for SessionError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
