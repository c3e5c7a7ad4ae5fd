//! Error types for database handle creation
//!
//! Opening a database is the only operation that can fail. A lookup that
//! finds nothing is a normal outcome and is reported as `None` by the
//! query methods, never as an error.

use std::fmt;

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, OpenError>;

/// Error returned when a database handle cannot be created
///
/// Covers a missing or unreadable file as well as a file that is not a
/// valid database. No partial or degraded handle is ever returned
/// alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    /// The file could not be read
    Io(String),

    /// The file is not a valid database
    Format(String),
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::Io(msg) => write!(f, "Cannot create database handle: {}", msg),
            OpenError::Format(msg) => {
                write!(f, "Cannot create database handle: invalid database: {}", msg)
            }
        }
    }
}

impl std::error::Error for OpenError {}

impl From<std::io::Error> for OpenError {
    fn from(err: std::io::Error) -> Self {
        OpenError::Io(err.to_string())
    }
}

impl From<maxminddb::MaxMindDBError> for OpenError {
    fn from(err: maxminddb::MaxMindDBError) -> Self {
        match err {
            maxminddb::MaxMindDBError::IoError(msg) => OpenError::Io(msg),
            other => OpenError::Format(other.to_string()),
        }
    }
}
