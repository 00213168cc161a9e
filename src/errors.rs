/*!
 * Error types for the subreflow application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. The reflow engine
 * itself never fails on cue content; these errors only surface at the file,
 * timestamp and configuration boundaries.
 */

use thiserror::Error;

/// Errors that can occur while reading or constructing subtitle cues
#[derive(Error, Debug, PartialEq)]
pub enum SubtitleError {
    /// A timestamp did not match `HH:MM:SS,mmm`
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    /// A timestamp had out-of-range minutes, seconds or milliseconds
    #[error("Invalid time components in timestamp: {0}")]
    InvalidTimeComponents(String),

    /// End time is not after start time
    #[error("Invalid time range: end time {end_ms} <= start time {start_ms}")]
    InvalidTimeRange {
        /// Start of the cue in milliseconds
        start_ms: u64,
        /// End of the cue in milliseconds
        end_ms: u64,
    },
}

/// Errors raised when a configuration is internally inconsistent
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A numeric setting must be strictly positive
    #[error("Setting '{0}' must be greater than zero")]
    NotPositive(&'static str),

    /// A ratio setting must be within (0, 1]
    #[error("Setting '{name}' must be within (0, 1], got {value}")]
    RatioOutOfRange {
        /// Name of the setting
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Two settings contradict each other
    #[error("Inconsistent settings: {0}")]
    Inconsistent(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from configuration validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
