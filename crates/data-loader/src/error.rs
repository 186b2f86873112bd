//! Error types for the data-loader crate.
//!
//! Only the loader can fail. Once a `Job` or `Cv` exists in canonical form,
//! scoring and searching over it never returns an error.

use thiserror::Error;

/// Errors that can occur while loading and adapting marketplace records
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not a JSON array of records
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single record couldn't be adapted to the canonical shape
    ///
    /// `record` is 1-based, counted inside the top-level array.
    #[error("Parse error at record {record} in {file}: {reason}")]
    ParseError {
        file: String,
        record: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
