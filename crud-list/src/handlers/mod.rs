//! HTTP handlers for paginated list endpoints
//!
//! This module provides the request-facing half of a list endpoint. It
//! builds on the [`repository`](crate::repository) traits and turns a raw
//! request into exactly one JSON response.
//!
//! # Features
//!
//! - **List pipeline**: [`ListOperation`] decodes, validates, fetches, counts and responds
//! - **Queries**: [`ListQuery`] for caller-defined query types with optional [`Pagination`]
//! - **Responses**: [`ResponseEmitter`] and the default [`JsonResponder`]
//! - **Error Handling**: [`ListError`] with automatic HTTP status code mapping
//!
//! # Integration with Axum
//!
//! A [`ListOperation`] is not tied to any router. Wrap it in an `Arc` and
//! call it from whatever handler the router expects:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::{extract::{Request, State}, response::Response, routing::get, Router};
//! use crud_list::handlers::ListOperation;
//!
//! type Users = ListOperation<User, UserQuery, UserAccessor>;
//!
//! async fn list_users(State(users): State<Arc<Users>>, request: Request) -> Response {
//!     users.handle(request).await
//! }
//!
//! let app = Router::new()
//!     .route("/users", get(list_users))
//!     .with_state(Arc::new(Users::json(UserAccessor::new(pool))));
//! ```

mod error;
mod list;
mod query;
mod response;

// Re-export all public types
pub use error::{ErrorKind, ListError};
pub use list::{ListOperation, DEFAULT_TIMEOUT};
pub use query::{window, ListQuery, Pagination, MAX_PAGE_SIZE, MIN_PAGE};
pub use response::{
    EmitError, ErrorResponse, JsonResponder, ListResponse, PaginationMeta, ResponseEmitter,
};
