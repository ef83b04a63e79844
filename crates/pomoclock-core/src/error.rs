//! Core error types for pomoclock-core.
//!
//! Every failure the core can produce is local and recoverable: bad user
//! input, an unreadable config file, or a notifier that could not play its
//! cue. None of them can stop a running countdown.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomoclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected settings or user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An interval duration that is zero or negative
    #[error("'{field}' must be a positive number of minutes, got {value}")]
    NonPositiveDuration { field: String, value: i64 },

    /// Input that could not be interpreted at all
    #[error("Invalid value '{value}' for '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

impl ValidationError {
    /// Name of the rejected field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::NonPositiveDuration { field, .. }
            | ValidationError::InvalidValue { field, .. } => field,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home directory could not be resolved
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Failures reported by a notifier while playing an interval cue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Audio or display backend is missing
    #[error("Notification backend unavailable: {0}")]
    Unavailable(String),

    /// Backend present but the cue could not be delivered
    #[error("Notification failed: {0}")]
    Failed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
