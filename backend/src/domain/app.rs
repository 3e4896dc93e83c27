//! Root application service.

/// Greeting returned by the root endpoint.
pub const GREETING: &str = "Hello World!";

/// Stateless service behind the root endpoint.
///
/// # Examples
/// ```
/// use backend::domain::AppService;
///
/// assert_eq!(AppService.hello(), "Hello World!");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppService;

impl AppService {
    /// Text served at `/`.
    #[must_use]
    pub const fn hello(&self) -> &'static str {
        GREETING
    }
}
