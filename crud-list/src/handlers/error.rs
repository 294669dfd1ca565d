//! Request error types for list operations
//!
//! A [`ListError`] is what the client sees. It carries a kind (which fixes
//! the status code and the generic message) and optional structured
//! details. Underlying causes are logged by the handler and never copied
//! into the error.
//!
//! # Example
//!
//! ```rust
//! use crud_list::handlers::{ErrorKind, ListError};
//!
//! let error = ListError::bad_request();
//! assert_eq!(error.kind, ErrorKind::BadRequest);
//! assert_eq!(error.to_string(), "bad request");
//! assert_eq!(error.status_code().as_u16(), 400);
//! ```

use std::fmt;

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::response::{JsonResponder, ResponseEmitter};
use crate::repository::AccessorError;

/// Category of request error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or invalid query parameters
    BadRequest,
    /// Entity was not found
    NotFound,
    /// Operation conflicts with current state
    Conflict,
    /// Downstream failure
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad_request"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl ErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message for this error kind
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::Internal => "internal server error",
        }
    }
}

/// Client-facing error with optional structured details
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .kind.message())]
pub struct ListError {
    /// The category of error
    pub kind: ErrorKind,
    details: Option<Value>,
}

impl ListError {
    /// Create an error of the given kind without details
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            details: None,
        }
    }

    /// Malformed or invalid input (400)
    #[must_use]
    pub const fn bad_request() -> Self {
        Self::new(ErrorKind::BadRequest)
    }

    /// Entity not found (404)
    #[must_use]
    pub const fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// State conflict (409)
    #[must_use]
    pub const fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    /// Downstream failure (500)
    #[must_use]
    pub const fn internal() -> Self {
        Self::new(ErrorKind::Internal)
    }

    /// Attach structured details for the `details` field of the error body
    ///
    /// # Example
    ///
    /// ```rust
    /// use crud_list::handlers::ListError;
    /// use serde_json::json;
    ///
    /// let error = ListError::bad_request().with_details(json!({ "field": "page" }));
    /// assert_eq!(error.details(), Some(&json!({ "field": "page" })));
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Structured details, if any
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}

impl From<AccessorError> for ListError {
    fn from(_: AccessorError) -> Self {
        Self::internal()
    }
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        JsonResponder.emit_error(&self, self.status_code())
    }
}
