//! Core error types for wakeplay-core.
//!
//! Every error here is recoverable: validation failures are surfaced to the
//! caller, persistence failures fall back or fail the single operation, and
//! malformed collaborator messages are logged and dropped. Nothing is fatal
//! to the process.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wakeplay-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence-related errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Trigger attempted without a usable media reference
    #[error("No playable media configured: {reference:?}")]
    UnconfiguredMedia { reference: String },

    /// Malformed message received from the embedded media collaborator
    #[error("Unparseable player message: {0}")]
    MessageParse(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence-specific errors for the whole-record config store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to read a stored record
    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// Failed to write a stored record
    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    /// Stored record did not parse
    #[error("Failed to parse {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Could not resolve the per-user data directory
    #[error("Could not resolve data directory: {0}")]
    NoDataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Target time must be zero-padded HH:MM, hour 0-23, minute 0-59.
    #[error("Invalid alarm time {value:?}: expected zero-padded HH:MM")]
    InvalidTimeFormat { value: String },

    /// Unknown flat config key in get/set access
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid value for a flat config key
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
