//! Error types for the hearing-test core

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, HearingError>;

/// Errors raised by the threshold procedure and the calibration math
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HearingError {
    /// Staircase bounds or step configuration is unusable
    #[error("Invalid staircase configuration: {0}")]
    InvalidStaircase(String),

    /// Frequency list contains an entry that cannot be presented
    #[error("Invalid frequency list: {0}")]
    InvalidFrequencies(String),

    /// No normal-hearing reference is defined for this frequency
    #[error("No hearing-level reference for {0} Hz")]
    MissingReference(u32),
}
