//! Paginated list envelope.

use schemas::validation::deserialize_validated;
use schemas::{IssueCode, ObjectReader, Schema};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PaginationError;
use crate::request::{MAX_LIMIT, PageRequest};

/// One page of a larger collection.
///
/// ## Invariants
/// - `data.len() <= limit`
/// - `data.len() <= total`
/// - `page >= 1` and `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    data: Vec<T>,
    total: u64,
    page: u32,
    limit: u32,
}

impl<T> Paginated<T> {
    /// Wrap one page of items together with the size of the whole collection.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::PageOverflow`] when `data` does not fit in
    /// one page and [`PaginationError::TotalTooSmall`] when `total` is
    /// smaller than the page itself.
    pub fn try_new(data: Vec<T>, total: u64, request: PageRequest) -> Result<Self, PaginationError> {
        if data.len() > request.limit_len() {
            return Err(PaginationError::PageOverflow {
                len: data.len(),
                limit: request.limit(),
            });
        }
        if total < len_u64(data.len()) {
            return Err(PaginationError::TotalTooSmall {
                total,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            total,
            page: request.page(),
            limit: request.limit(),
        })
    }

    /// Cut the page selected by `request` out of a full in-memory collection.
    #[must_use]
    pub fn from_items(all: Vec<T>, request: PageRequest) -> Self {
        let total = len_u64(all.len());
        let data = all
            .into_iter()
            .skip(request.offset())
            .take(request.limit_len())
            .collect();
        Self {
            data,
            total,
            page: request.page(),
            limit: request.limit(),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the envelope, yielding its items.
    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Size of the whole collection.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of pages needed to show the whole collection.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit.max(1)))
    }

    /// Whether a page follows this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Convert every item, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

impl<T: Schema> Schema for Paginated<T> {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let items: Option<Vec<T>> = fields.nested_list("data");
        let total_count: Option<u64> = fields.required("total");
        let page_number: Option<u32> = fields.required("page");
        let page_size: Option<u32> = fields.required("limit");

        let mut consistent = true;
        if page_number == Some(0) {
            fields.report("page", IssueCode::TooSmall { minimum: 1 });
            consistent = false;
        }
        if page_size == Some(0) {
            fields.report("limit", IssueCode::TooSmall { minimum: 1 });
            consistent = false;
        }
        if page_size.is_some_and(|size| size > MAX_LIMIT) {
            fields.report(
                "limit",
                IssueCode::TooBig {
                    maximum: u64::from(MAX_LIMIT),
                },
            );
            consistent = false;
        }
        let item_count = items.as_ref().map(|list| len_u64(list.len()));
        if let (Some(count), Some(size)) = (item_count, page_size) {
            if count > u64::from(size) {
                fields.report(
                    "data",
                    IssueCode::TooBig {
                        maximum: u64::from(size),
                    },
                );
                consistent = false;
            }
        }
        if let (Some(count), Some(reported)) = (item_count, total_count) {
            if reported < count {
                fields.report("total", IssueCode::TooSmall { minimum: count });
                consistent = false;
            }
        }

        let (Some(data), Some(total), Some(page), Some(limit)) =
            (items, total_count, page_number, page_size)
        else {
            return None;
        };
        consistent.then_some(Self {
            data,
            total,
            page,
            limit,
        })
    }
}

impl<'de, T: Schema> Deserialize<'de> for Paginated<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}
