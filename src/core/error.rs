//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// Enumeration failures are always recovered by the callers (an unreadable
/// directory degrades to an empty listing), so this type mostly travels as far
/// as a log line or a status message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// Represents an error that occurred when a Tokio task was joined.
    /// This is often due to a task panicking or being cancelled.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CoreError {
    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        CoreError::Io(source, path.into())
    }
}
