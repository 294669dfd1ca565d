//! Data accessor trait definition
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so implementations can
//! be written as plain `async fn` without `async_trait`.

use std::future::Future;
use std::sync::Arc;

use super::error::AccessorError;
use crate::context::RequestContext;

/// Result type for accessor calls
pub type AccessorResult<T> = std::result::Result<T, AccessorError>;

/// Backing data source for a list endpoint
///
/// # Type Parameters
///
/// - `T`: The item type returned to clients
/// - `Q`: The decoded and validated query type
///
/// # Contract
///
/// - `list` returns at most `limit` items matching `query`, skipping the
///   first `offset`. A `limit` of zero means no explicit limit: return every
///   match or apply the backend's own default.
/// - Ordering should be stable across identical calls.
/// - `count` returns the number of matches ignoring `offset` and `limit`.
/// - Both calls should watch `ctx` and return promptly once it is
///   cancelled, for example through [`RequestContext::observe`].
///
/// # Example
///
/// ```rust
/// use crud_list::context::RequestContext;
/// use crud_list::repository::{AccessorResult, DataAccessor};
///
/// struct Fruits(Vec<String>);
///
/// impl DataAccessor<String, ()> for Fruits {
///     async fn list(
///         &self,
///         _ctx: &RequestContext,
///         _query: &(),
///         offset: u64,
///         limit: u64,
///     ) -> AccessorResult<Vec<String>> {
///         let take = if limit == 0 { usize::MAX } else { limit as usize };
///         Ok(self.0.iter().skip(offset as usize).take(take).cloned().collect())
///     }
///
///     async fn count(&self, _ctx: &RequestContext, _query: &()) -> AccessorResult<i64> {
///         Ok(self.0.len() as i64)
///     }
/// }
/// ```
pub trait DataAccessor<T, Q>: Send + Sync {
    /// Fetch one window of items matching the query
    fn list(
        &self,
        ctx: &RequestContext,
        query: &Q,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = AccessorResult<Vec<T>>> + Send;

    /// Count all items matching the query
    fn count(
        &self,
        ctx: &RequestContext,
        query: &Q,
    ) -> impl Future<Output = AccessorResult<i64>> + Send;
}

impl<T, Q, A> DataAccessor<T, Q> for Arc<A>
where
    A: DataAccessor<T, Q>,
{
    fn list(
        &self,
        ctx: &RequestContext,
        query: &Q,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = AccessorResult<Vec<T>>> + Send {
        (**self).list(ctx, query, offset, limit)
    }

    fn count(
        &self,
        ctx: &RequestContext,
        query: &Q,
    ) -> impl Future<Output = AccessorResult<i64>> + Send {
        (**self).count(ctx, query)
    }
}
