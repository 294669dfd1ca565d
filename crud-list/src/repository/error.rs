//! Data accessor error types
//!
//! Accessors report failures with [`AccessorError`]. The list handler logs
//! these server-side and answers the client with a generic internal error,
//! so the message here may be as detailed as the backend likes.
//!
//! # Example
//!
//! ```rust
//! use crud_list::repository::{AccessorError, AccessorErrorKind, AccessorOperation};
//!
//! let error = AccessorError::timeout(AccessorOperation::Count, "statement timeout");
//! assert!(matches!(error.kind, AccessorErrorKind::Timeout));
//! assert!(error.is_retriable());
//! ```

use std::fmt;

/// Accessor call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorOperation {
    /// Fetching a page of items
    List,
    /// Counting items matching the query
    Count,
}

impl fmt::Display for AccessorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Count => write!(f, "count"),
        }
    }
}

/// Category of accessor error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorErrorKind {
    /// The request deadline passed before the backend answered
    Timeout,
    /// The request was cancelled (client went away)
    Cancelled,
    /// The backend could not be reached
    ConnectionFailed,
    /// The backend rejected or failed the query
    Backend,
    /// Other unclassified error
    Other,
}

impl fmt::Display for AccessorErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Backend => write!(f, "backend"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured accessor error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorError {
    /// The accessor call that failed
    pub operation: AccessorOperation,
    /// The category of error
    pub kind: AccessorErrorKind,
    /// Human-readable error message (server-side only)
    pub message: String,
}

impl AccessorError {
    /// Create a new accessor error
    pub fn new(
        operation: AccessorOperation,
        kind: AccessorErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: AccessorOperation, message: impl Into<String>) -> Self {
        Self::new(operation, AccessorErrorKind::Timeout, message)
    }

    /// Create a cancellation error
    pub fn cancelled(operation: AccessorOperation) -> Self {
        Self::new(
            operation,
            AccessorErrorKind::Cancelled,
            "request cancelled before completion",
        )
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: AccessorOperation, message: impl Into<String>) -> Self {
        Self::new(operation, AccessorErrorKind::ConnectionFailed, message)
    }

    /// Create a backend error
    pub fn backend(operation: AccessorOperation, message: impl Into<String>) -> Self {
        Self::new(operation, AccessorErrorKind::Backend, message)
    }

    /// Check if a retry of the same call could plausibly succeed
    ///
    /// The list handler itself never retries; this is for accessor
    /// implementations that wrap their own retry policy.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            AccessorErrorKind::Timeout | AccessorErrorKind::ConnectionFailed
        )
    }
}

impl fmt::Display for AccessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Accessor {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for AccessorError {}
