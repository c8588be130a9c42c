//! Error types for filedb core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in filedb operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The database directory is missing, unreachable, or not a directory.
    #[error("database not found; expected existing directory: {}", path.display())]
    DatabaseNotFound {
        /// Path that was opened.
        path: PathBuf,
    },

    /// I/O error while opening, reading, writing, removing or renaming a file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A record cannot be stored as a single line.
    #[error("invalid record: {message}")]
    InvalidRecord {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates a database not found error.
    pub fn database_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DatabaseNotFound { path: path.into() }
    }

    /// Creates an invalid record error.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Returns true if this is a [`CoreError::DatabaseNotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DatabaseNotFound { .. })
    }
}

impl From<tempfile::PersistError> for CoreError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
