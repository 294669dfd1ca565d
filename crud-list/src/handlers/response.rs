//! Response types and emitters for list handlers
//!
//! [`ResponseEmitter`] turns payloads and errors into HTTP responses. The
//! bundled [`JsonResponder`] writes compact JSON with an
//! `application/json` content type.
//!
//! # Example
//!
//! ```rust
//! use crud_list::handlers::{JsonResponder, ListResponse, PaginationMeta, ResponseEmitter};
//! use http::StatusCode;
//!
//! let body = ListResponse::new(vec!["item1"], PaginationMeta::from_window(0, 10, 1));
//! let response = JsonResponder.respond(Some(&body), StatusCode::OK).unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//! ```

use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use http::{header, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::error::{ErrorKind, ListError};

/// Failure while turning a payload into a response
#[derive(Debug, Error)]
pub enum EmitError {
    /// Payload could not be encoded as JSON
    #[error("failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Response could not be assembled
    #[error("failed to build response: {0}")]
    Http(#[from] http::Error),
}

/// Serializes success payloads and error envelopes
pub trait ResponseEmitter: Send + Sync {
    /// Build a response carrying `payload` with the given status
    ///
    /// `None` produces a response with headers and status only.
    fn respond<P>(&self, payload: Option<&P>, status: StatusCode) -> Result<Response, EmitError>
    where
        P: Serialize + ?Sized;

    /// Build an error response wrapping `err` in an [`ErrorResponse`]
    ///
    /// If the envelope itself cannot be written, logs the failure and falls
    /// back to a plain-text 500.
    fn emit_error(&self, err: &ListError, status: StatusCode) -> Response {
        let body = ErrorResponse::new(err, status);
        match self.respond(Some(&body), status) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    status = status.as_u16(),
                    error = %e,
                    "unable to write error response"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorKind::Internal.message(),
                )
                    .into_response()
            }
        }
    }
}

/// Default emitter writing compact JSON bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponder;

impl ResponseEmitter for JsonResponder {
    fn respond<P>(&self, payload: Option<&P>, status: StatusCode) -> Result<Response, EmitError>
    where
        P: Serialize + ?Sized,
    {
        let body = match payload {
            Some(payload) => Body::from(serde_json::to_vec(payload)?),
            None => Body::empty(),
        };

        let response = http::Response::builder()
            .status(status)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(body)?;

        Ok(response)
    }
}

/// Error envelope written for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Human-readable error message
    pub message: String,
    /// Additional error details, `null` when the error has none
    pub details: Option<Value>,
}

impl ErrorResponse {
    /// Build the envelope for `err` sent with `status`
    pub fn new(err: &ListError, status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            message: err.to_string(),
            details: err.details().cloned(),
        }
    }
}

/// Pagination block echoed back with every list response
///
/// `page` and `page_size` describe the window the accessor was actually
/// asked for, not the raw query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Total number of items matching the query
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u64,
    /// Items per page, zero when no limit was applied
    pub page_size: u64,
}

impl PaginationMeta {
    /// Derive the echo from the effective offset and limit
    ///
    /// A zero limit means no pagination was applied and reports page 1.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crud_list::handlers::PaginationMeta;
    ///
    /// let meta = PaginationMeta::from_window(40, 20, 100);
    /// assert_eq!(meta.page, 3);
    /// assert_eq!(meta.page_size, 20);
    ///
    /// let unpaged = PaginationMeta::from_window(0, 0, 7);
    /// assert_eq!(unpaged.page, 1);
    /// assert_eq!(unpaged.page_size, 0);
    /// ```
    #[must_use]
    pub fn from_window(offset: u64, limit: u64, total: i64) -> Self {
        let page = match limit {
            0 => 1,
            limit => offset / limit + 1,
        };
        Self {
            total,
            page,
            page_size: limit,
        }
    }
}

/// Success payload of a list request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// The items in the requested window
    pub items: Vec<T>,
    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T> ListResponse<T> {
    /// Create a new list response
    pub fn new(items: Vec<T>, pagination: PaginationMeta) -> Self {
        Self { items, pagination }
    }

    /// Get the number of items in the current page
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the current page is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
