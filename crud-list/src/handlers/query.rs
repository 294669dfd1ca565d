//! Query types for list operations
//!
//! A list endpoint decodes the URL query string into a caller-defined type
//! implementing [`ListQuery`]. Types that support paging embed a
//! [`Pagination`] and hand it back from [`ListQuery::pagination`].
//!
//! # Example
//!
//! ```rust
//! use crud_list::handlers::{ListQuery, Pagination};
//! use serde::Deserialize;
//! use validator::Validate;
//!
//! #[derive(Debug, Deserialize, Validate)]
//! struct UserQuery {
//!     #[serde(flatten)]
//!     #[validate(nested)]
//!     pagination: Pagination,
//!     name: Option<String>,
//! }
//!
//! impl ListQuery for UserQuery {
//!     fn pagination(&self) -> Option<Pagination> {
//!         Some(self.pagination)
//!     }
//! }
//! ```

use std::fmt;

use serde::{
    de::{self, DeserializeOwned, Unexpected, Visitor},
    Deserialize, Deserializer, Serialize,
};
use validator::Validate;

/// Smallest accepted page number
pub const MIN_PAGE: u32 = 1;

/// Maximum allowed items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page-based pagination parameters
///
/// Both fields are required. Out-of-range values fail validation; they are
/// never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Pagination {
    /// Page number, starting from 1
    #[serde(deserialize_with = "deserialize_u32")]
    #[validate(range(min = 1))]
    pub page: u32,

    /// Number of items per page, at most 100
    #[serde(deserialize_with = "deserialize_u32")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u32,
}

impl Pagination {
    /// Create pagination parameters without validating them
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Number of items to skip: `(page - 1) * page_size`
    ///
    /// # Example
    ///
    /// ```rust
    /// use crud_list::handlers::Pagination;
    ///
    /// assert_eq!(Pagination::new(1, 10).offset(), 0);
    /// assert_eq!(Pagination::new(3, 25).offset(), 50);
    /// ```
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Maximum number of items to return
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// Query types accepted by a list endpoint
///
/// Implementors are decoded from the query string with serde and checked
/// with `validator` before any data is fetched. Paging is optional: the
/// default [`pagination`](ListQuery::pagination) returns `None`, in which
/// case the accessor is called with `offset = 0` and `limit = 0`.
pub trait ListQuery: DeserializeOwned + Validate + fmt::Debug + Send + Sync {
    /// Pagination carried by this query, if the type supports paging
    fn pagination(&self) -> Option<Pagination> {
        None
    }
}

impl ListQuery for Pagination {
    fn pagination(&self) -> Option<Pagination> {
        Some(*self)
    }
}

/// Effective `(offset, limit)` window for an optional pagination
///
/// # Example
///
/// ```rust
/// use crud_list::handlers::{window, Pagination};
///
/// assert_eq!(window(Some(Pagination::new(2, 10))), (10, 10));
/// assert_eq!(window(None), (0, 0));
/// ```
#[must_use]
pub fn window(pagination: Option<Pagination>) -> (u64, u64) {
    match pagination {
        Some(pagination) => (pagination.offset(), pagination.limit()),
        None => (0, 0),
    }
}

/// Accept a `u32` given either as a number or as a decimal string
///
/// Query string values are always strings, and `#[serde(flatten)]` hides
/// the target type from the form decoder, so the plain `u32` impl would
/// reject them.
fn deserialize_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct U32Visitor;

    impl Visitor<'_> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an unsigned 32-bit integer")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            v.parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(U32Visitor)
}
