//! Error types for strindex and the caches built on it

use std::collections::TryReserveError;
use std::fmt;

/// Result type alias for index and cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for index and cache operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument was absent (e.g. an empty key)
    InvalidArgument(&'static str),

    /// Capacity must be at least one entry
    InvalidCapacity(usize),

    /// A fallible reservation could not be satisfied
    Alloc(TryReserveError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(what) => write!(f, "Invalid argument: {}", what),
            Error::InvalidCapacity(cap) => {
                write!(f, "Invalid capacity: {} (must be at least 1)", cap)
            }
            Error::Alloc(e) => write!(f, "Allocation failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Alloc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Error::Alloc(err)
    }
}
