//! Error types for benchkit
//!
//! Every fallible operation in the library returns [`Result`]. The binary
//! wraps these in `anyhow` for top-level context.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// benchkit error types
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset name has no registered loader
    #[error("Dataset '{0}' is not recognized")]
    UnknownDataset(String),

    /// Method kind has no registered implementation
    #[error("Method '{0}' is not recognized")]
    UnknownMethod(String),

    /// Metric name the evaluator cannot compute
    #[error("Metric '{0}' is not supported by the evaluator")]
    UnknownMetric(String),

    /// Invalid input (bad parameters, mismatched lengths, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Result table has an unexpected shape or content
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow/CSV error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is a missing file (as opposed to a malformed one).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
