//! Errors raised while building page requests and envelopes.

use thiserror::Error;

/// Reasons a page request or paginated envelope cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Pages are numbered from one.
    #[error("page must be at least 1, got {page}")]
    InvalidPage {
        /// Rejected page number.
        page: u32,
    },
    /// The page size is outside the accepted range.
    #[error("limit must be between 1 and {max}, got {limit}")]
    InvalidLimit {
        /// Rejected page size.
        limit: u32,
        /// Largest accepted page size.
        max: u32,
    },
    /// More items were supplied than fit on one page.
    #[error("page holds {len} items but the limit is {limit}")]
    PageOverflow {
        /// Number of items supplied.
        len: usize,
        /// Page size.
        limit: u32,
    },
    /// The reported total is smaller than the page itself.
    #[error("total {total} is smaller than the {len} items on the page")]
    TotalTooSmall {
        /// Reported total.
        total: u64,
        /// Number of items on the page.
        len: usize,
    },
    /// A query parameter is not a number.
    #[error("query parameter `{param}` must be a positive integer, got `{value}`")]
    InvalidQuery {
        /// Parameter name.
        param: &'static str,
        /// Raw parameter value.
        value: String,
    },
}
