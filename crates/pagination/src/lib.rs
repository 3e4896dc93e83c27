//! Page requests and the paginated list envelope.
//!
//! List endpoints read a [`PageRequest`] from the request query string and
//! answer with a [`Paginated`] envelope holding one page of items together
//! with the size of the whole collection.
//!
//! # Example
//!
//! ```
//! use pagination::{PageRequest, Paginated};
//! use url::Url;
//!
//! let url = Url::parse("http://localhost/users?page=2&limit=2").expect("valid url");
//! let request = PageRequest::from_url(&url).expect("valid paging");
//! let page = Paginated::from_items(vec!["a", "b", "c", "d", "e"], request);
//!
//! assert_eq!(page.data(), &["c", "d"]);
//! assert_eq!(page.total(), 5);
//! assert!(page.has_next_page());
//! ```

mod envelope;
mod error;
mod request;

pub use envelope::Paginated;
pub use error::PaginationError;
pub use request::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageRequest};
