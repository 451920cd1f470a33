//! Error types for the sheetcal pipeline.
//!
//! Per-record problems (malformed rows, unparsable dates) are not errors in
//! this enum: they skip the record and end up in the build report instead.

use thiserror::Error;

/// Errors that abort the run, or a single feed's output.
#[derive(Error, Debug)]
pub enum SheetCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch CSV from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Missing required column '{0}' in CSV header")]
    MissingColumn(String),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sheetcal operations.
pub type SheetCalResult<T> = Result<T, SheetCalError>;
