//! Generic list operation
//!
//! [`ListOperation`] runs one list request end to end:
//!
//! 1. scopes the request to a deadline ([`RequestContext`]),
//! 2. decodes the query string into `Q`,
//! 3. validates `Q`,
//! 4. derives `offset`/`limit` from the optional [`Pagination`](super::Pagination),
//! 5. fetches the window from the [`DataAccessor`],
//! 6. counts all matches,
//! 7. emits `{ items, pagination }` with status 200.
//!
//! Decode and validation failures answer 400 without touching the accessor.
//! Accessor failures answer 500 and are logged server-side only. Exactly one
//! response is produced per request.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::{extract::Request, routing::get, Router};
//! use crud_list::handlers::ListOperation;
//!
//! let users = Arc::new(ListOperation::json(UserAccessor::new(pool)));
//!
//! let app = Router::new().route(
//!     "/users",
//!     get(move |request: Request| {
//!         let users = users.clone();
//!         async move { users.handle(request).await }
//!     }),
//! );
//! ```

use std::marker::PhantomData;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Query, Request},
    response::{IntoResponse, Response},
};
use http::{request::Parts, StatusCode, Uri};
use serde::Serialize;
use validator::Validate;

use super::error::ListError;
use super::query::{window, ListQuery};
use super::response::{JsonResponder, ListResponse, PaginationMeta, ResponseEmitter};
use crate::config::{ListConfig, DEFAULT_TIMEOUT_SECS};
use crate::context::RequestContext;
use crate::repository::DataAccessor;

/// Default upper bound for one list request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Reusable handler for one list endpoint
///
/// # Type Parameters
///
/// - `T`: The item type being listed
/// - `Q`: The query type decoded from the query string
/// - `A`: The data accessor
/// - `E`: The response emitter, [`JsonResponder`] by default
///
/// The operation holds no per-request state and can be shared across tasks
/// behind an `Arc`.
pub struct ListOperation<T, Q, A, E = JsonResponder> {
    accessor: A,
    emitter: E,
    timeout: Duration,
    _marker: PhantomData<fn() -> (T, Q)>,
}

impl<T, Q, A> ListOperation<T, Q, A, JsonResponder>
where
    T: Serialize + Send,
    Q: ListQuery,
    A: DataAccessor<T, Q>,
{
    /// Create a list operation that answers with [`JsonResponder`]
    pub fn json(accessor: A) -> Self {
        Self::new(accessor, JsonResponder)
    }
}

impl<T, Q, A, E> ListOperation<T, Q, A, E>
where
    T: Serialize + Send,
    Q: ListQuery,
    A: DataAccessor<T, Q>,
    E: ResponseEmitter,
{
    /// Create a list operation from its two collaborators
    pub fn new(accessor: A, emitter: E) -> Self {
        Self {
            accessor,
            emitter,
            timeout: DEFAULT_TIMEOUT,
            _marker: PhantomData,
        }
    }

    /// Override the per-request deadline
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Apply settings from a loaded [`ListConfig`]
    #[must_use]
    pub fn with_config(self, config: &ListConfig) -> Self {
        self.with_timeout(config.timeout())
    }

    /// Per-request deadline applied to accessor calls
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Handle a list request
    ///
    /// Only the method, URI and extensions are read; the body is dropped.
    pub async fn handle(&self, request: Request) -> Response {
        let (parts, _) = request.into_parts();
        self.handle_parts(&parts).await
    }

    /// Handle a list request given its head
    pub async fn handle_parts(&self, parts: &Parts) -> Response {
        let started = Instant::now();
        let remote_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        tracing::debug!(
            method = %parts.method,
            path = %parts.uri.path(),
            remote_addr = ?remote_addr,
            "list.start"
        );

        let ctx = RequestContext::with_timeout(self.timeout);
        // Cancels the context when the request finishes or is abandoned.
        let _guard = ctx.drop_guard();

        let response = match self.run(&ctx, &parts.uri).await {
            Ok(body) => self.emit(&body),
            Err(err) => self.emitter.emit_error(&err, err.status_code()),
        };

        tracing::debug!(duration = ?started.elapsed(), "list.complete");
        response
    }

    async fn run(&self, ctx: &RequestContext, uri: &Uri) -> Result<ListResponse<T>, ListError> {
        let Query(query) = Query::<Q>::try_from_uri(uri).map_err(|rejection| {
            tracing::error!(error = %rejection, "unable to decode query params");
            tracing::debug!(query_params = uri.query().unwrap_or_default(), "query params decoding");
            ListError::bad_request()
        })?;

        if let Err(errors) = Validate::validate(&query) {
            tracing::error!(error = %errors, "unable to validate query params");
            tracing::debug!(query_params = uri.query().unwrap_or_default(), "query params validation");
            return Err(ListError::bad_request());
        }

        let (offset, limit) = window(query.pagination());

        let items = self
            .accessor
            .list(ctx, &query, offset, limit)
            .await
            .map_err(|err| {
                tracing::error!(kind = %err.kind, error = %err, "unable to list items");
                tracing::debug!(query = ?query, offset, limit, "listing");
                ListError::from(err)
            })?;

        let total = self.accessor.count(ctx, &query).await.map_err(|err| {
            tracing::error!(kind = %err.kind, error = %err, "unable to count items");
            tracing::debug!(query = ?query, "counting");
            ListError::from(err)
        })?;

        Ok(ListResponse::new(
            items,
            PaginationMeta::from_window(offset, limit, total),
        ))
    }

    fn emit(&self, body: &ListResponse<T>) -> Response {
        match self.emitter.respond(Some(body), StatusCode::OK) {
            Ok(response) => response,
            Err(err) => {
                // Status is already decided; send it without a second error body.
                tracing::error!(error = %err, "unable to write response");
                tracing::debug!(
                    items = body.len(),
                    pagination = ?body.pagination,
                    "writing response"
                );
                StatusCode::OK.into_response()
            }
        }
    }
}

impl<T, Q, A, E> std::fmt::Debug for ListOperation<T, Q, A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListOperation")
            .field("item", &std::any::type_name::<T>())
            .field("query", &std::any::type_name::<Q>())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
