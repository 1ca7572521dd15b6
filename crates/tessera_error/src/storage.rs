//! Storage error types for the story repository and agent directory.

use std::path::PathBuf;

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Record not found
    #[display("Record not found: {}", _0)]
    NotFound(String),
    /// A record with the same identifier already exists
    #[display("Record already exists: {}", _0)]
    AlreadyExists(String),
    /// Storage backend is unavailable
    #[display("Storage unavailable: {}", _0)]
    Unavailable(String),
    /// Reading or writing a backing file failed
    #[display("File I/O error: {} ({})", path.display(), message)]
    FileIo {
        /// Path that caused the error
        path: PathBuf,
        /// Error message
        message: String,
    },
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use tessera_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::AlreadyExists("story-1".to_string()));
/// assert!(format!("{}", err).contains("already exists"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
