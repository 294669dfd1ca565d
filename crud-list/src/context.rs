//! Bounded execution context handed to data accessors
//!
//! Every list request runs under a deadline. The handler builds a
//! [`RequestContext`] when the request arrives and passes it to each
//! accessor call. It never interrupts an accessor itself: accessors are
//! expected to watch [`RequestContext::cancelled`] around blocking I/O and
//! return promptly once it fires.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use crud_list::context::RequestContext;
//! use crud_list::repository::{AccessorError, AccessorOperation};
//!
//! # async fn run() -> Result<(), AccessorError> {
//! let ctx = RequestContext::with_timeout(Duration::from_secs(30));
//! let rows = ctx
//!     .observe(AccessorOperation::List, async { Ok::<_, AccessorError>(vec![1, 2, 3]) })
//!     .await?;
//! assert_eq!(rows.len(), 3);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::repository::{AccessorError, AccessorOperation};

/// Deadline distance used when `now + timeout` does not fit in an [`Instant`]
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Deadline and cancellation signal for one list request
#[derive(Debug, Clone)]
pub struct RequestContext {
    deadline: Instant,
    token: CancellationToken,
}

impl RequestContext {
    /// Create a context that expires `timeout` from now
    ///
    /// Timeouts too large to represent are treated as roughly thirty years.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self::with_deadline(deadline, CancellationToken::new())
    }

    /// Create a context from an explicit deadline and token
    ///
    /// Use a child token of a server-wide token to propagate shutdown.
    #[must_use]
    pub fn with_deadline(deadline: Instant, token: CancellationToken) -> Self {
        Self { deadline, token }
    }

    /// Instant after which the request should be abandoned
    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has passed
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Whether the request was cancelled or its deadline has passed
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.is_expired()
    }

    /// Resolves once the request is cancelled or the deadline passes
    pub async fn cancelled(&self) {
        tokio::select! {
            _ = self.token.cancelled() => {}
            _ = sleep_until(self.deadline) => {}
        }
    }

    /// Cancel the request explicitly
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Underlying cancellation token
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Guard that cancels this context when dropped
    pub(crate) fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Run an accessor future, abandoning it when the context ends
    ///
    /// Returns a `Timeout` error if the deadline passes first and a
    /// `Cancelled` error if the token fires first.
    pub async fn observe<F, T>(&self, operation: AccessorOperation, fut: F) -> Result<T, AccessorError>
    where
        F: Future<Output = Result<T, AccessorError>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(AccessorError::cancelled(operation)),
            _ = sleep_until(self.deadline) => Err(AccessorError::timeout(
                operation,
                "request deadline exceeded",
            )),
            result = fut => result,
        }
    }
}
