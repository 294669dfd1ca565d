//! # crud-list
//!
//! Generic, router-agnostic handler for paginated JSON list endpoints.
//!
//! ## Features
//!
//! - **One pipeline per endpoint**: decode, validate, paginate, fetch, count, respond
//! - **Pluggable storage**: any [`DataAccessor`](repository::DataAccessor) implementation
//! - **Pluggable output**: any [`ResponseEmitter`](handlers::ResponseEmitter), JSON by default
//! - **Bounded requests**: every accessor call receives a [`RequestContext`](context::RequestContext) with a deadline
//! - **Safe errors**: clients see `400` or `500` envelopes, causes stay in the logs
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use axum::{extract::Request, routing::get, Router};
//! use crud_list::prelude::*;
//!
//! struct Numbers;
//!
//! impl DataAccessor<u32, Pagination> for Numbers {
//!     async fn list(
//!         &self,
//!         _ctx: &RequestContext,
//!         _query: &Pagination,
//!         offset: u64,
//!         limit: u64,
//!     ) -> AccessorResult<Vec<u32>> {
//!         Ok((0..1_000u32).skip(offset as usize).take(limit as usize).collect())
//!     }
//!
//!     async fn count(&self, _ctx: &RequestContext, _query: &Pagination) -> AccessorResult<i64> {
//!         Ok(1_000)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load configuration
//!     let config = ListConfig::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     let numbers = Arc::new(
//!         ListOperation::<u32, Pagination, _>::json(Numbers).with_config(&config),
//!     );
//!
//!     let app: Router = Router::new().route(
//!         "/numbers",
//!         get(move |request: Request| {
//!             let numbers = numbers.clone();
//!             async move { numbers.handle(request).await }
//!         }),
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod repository;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ListConfig;
    pub use crate::context::RequestContext;
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        ErrorKind, JsonResponder, ListError, ListOperation, ListQuery, ListResponse, Pagination,
        PaginationMeta, ResponseEmitter,
    };
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        AccessorError, AccessorErrorKind, AccessorOperation, AccessorResult, DataAccessor,
    };
}
