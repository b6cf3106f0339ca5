//! Error types for cg-output.

use thiserror::Error;

/// Errors that can occur when writing or reading city documents.
///
/// I/O failures propagate untouched; partially written files are left on
/// disk for the caller to clean up.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
