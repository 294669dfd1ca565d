//! Data accessor abstraction for list endpoints
//!
//! The list handler never talks to storage directly. Callers supply a
//! [`DataAccessor`] that knows how to fetch a window of items and count the
//! full result set for a decoded query.
//!
//! # Example
//!
//! ```rust,ignore
//! use crud_list::context::RequestContext;
//! use crud_list::repository::{AccessorError, AccessorOperation, AccessorResult, DataAccessor};
//!
//! struct UserAccessor {
//!     pool: PgPool,
//! }
//!
//! impl DataAccessor<User, UserQuery> for UserAccessor {
//!     async fn list(
//!         &self,
//!         ctx: &RequestContext,
//!         query: &UserQuery,
//!         offset: u64,
//!         limit: u64,
//!     ) -> AccessorResult<Vec<User>> {
//!         ctx.observe(AccessorOperation::List, async {
//!             sqlx::query_as!(User, "SELECT * FROM users WHERE name ILIKE $1 ORDER BY id OFFSET $2 LIMIT $3",
//!                 query.name_pattern(), offset as i64, limit_or_all(limit))
//!                 .fetch_all(&self.pool)
//!                 .await
//!                 .map_err(|e| AccessorError::backend(AccessorOperation::List, e.to_string()))
//!         })
//!         .await
//!     }
//!
//!     async fn count(&self, ctx: &RequestContext, query: &UserQuery) -> AccessorResult<i64> {
//!         todo!()
//!     }
//! }
//! ```

mod error;
mod traits;

// Re-export all public types
pub use error::{AccessorError, AccessorErrorKind, AccessorOperation};
pub use traits::{AccessorResult, DataAccessor};
