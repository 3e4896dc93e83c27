//! Shared cache-control policies for HTTP handlers.

use actix_web::http::header;

/// Responses that must never be stored by any cache.
pub const NO_STORE: &str = "no-store";

/// Build the cache-control header tuple for probe responses.
#[must_use]
pub const fn no_store_header() -> (header::HeaderName, &'static str) {
    (header::CACHE_CONTROL, NO_STORE)
}
