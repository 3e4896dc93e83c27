//! Page selection carried in list request query strings.

use serde::Serialize;
use url::Url;

use crate::error::PaginationError;

/// Page number used when a request does not name one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when a request does not name one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

const PAGE_PARAM: &str = "page";
const LIMIT_PARAM: &str = "limit";

/// Validated page selection.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Validate a page selection.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] for page zero and
    /// [`PaginationError::InvalidLimit`] when `limit` is zero or above
    /// [`MAX_LIMIT`].
    pub const fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::InvalidPage { page });
        }
        if limit < 1 || limit > MAX_LIMIT {
            return Err(PaginationError::InvalidLimit {
                limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// Read `page` and `limit` from the query string of `url`, falling back
    /// to the defaults for missing parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidQuery`] when a parameter is not a
    /// number, or the range errors of [`PageRequest::new`].
    pub fn from_url(url: &Url) -> Result<Self, PaginationError> {
        let mut page = DEFAULT_PAGE;
        let mut limit = DEFAULT_LIMIT;
        for (key, value) in url.query_pairs() {
            match &*key {
                PAGE_PARAM => page = parse_param(PAGE_PARAM, &value)?,
                LIMIT_PARAM => limit = parse_param(LIMIT_PARAM, &value)?,
                _ => {}
            }
        }
        Self::new(page, limit)
    }

    /// Write this selection into the query string of `url`, replacing any
    /// previous `page` and `limit` while keeping other parameters.
    pub fn apply_to(&self, url: &mut Url) {
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != PAGE_PARAM && key != LIMIT_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair(PAGE_PARAM, &self.page.to_string())
            .append_pair(LIMIT_PARAM, &self.limit.to_string());
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

    /// Number of items preceding this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        let skipped_pages = usize::try_from(self.page.saturating_sub(1)).unwrap_or(usize::MAX);
        skipped_pages.saturating_mul(self.limit_len())
    }

    pub(crate) fn limit_len(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }
}

fn parse_param(param: &'static str, value: &str) -> Result<u32, PaginationError> {
    value.parse().map_err(|_| PaginationError::InvalidQuery {
        param,
        value: value.to_owned(),
    })
}
