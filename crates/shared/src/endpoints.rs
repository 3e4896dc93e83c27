//! Every HTTP path the API exposes.
//!
//! Handlers, clients, and tests take their paths from here; the workspace
//! architecture lint rejects path literals anywhere else.

use std::fmt::Display;

use pagination::PageRequest;

/// Path table of the API.
#[derive(Debug, Clone, Copy)]
pub struct ApiEndpoints;

impl ApiEndpoints {
    /// Landing route answering with a greeting.
    pub const ROOT: &'static str = "/";
    /// Liveness probe.
    pub const HEALTH: &'static str = "/health";
    /// User collection.
    pub const USERS: &'static str = "/users";
    /// Post collection.
    pub const POSTS: &'static str = "/posts";

    /// Route pattern for a single user, as registered with the router.
    pub const USER_PATTERN: &'static str = "/users/{id}";
    /// Route pattern for a single post, as registered with the router.
    pub const POST_PATTERN: &'static str = "/posts/{id}";
    /// Route pattern for the posts of one user, as registered with the router.
    pub const USER_POSTS_PATTERN: &'static str = "/users/{id}/posts";

    /// Path of the user `id`.
    #[must_use]
    pub fn user(id: impl Display) -> String {
        format!("{}/{id}", Self::USERS)
    }

    /// Path of the post `id`.
    #[must_use]
    pub fn post(id: impl Display) -> String {
        format!("{}/{id}", Self::POSTS)
    }

    /// Path of the posts written by user `id`.
    #[must_use]
    pub fn user_posts(id: impl Display) -> String {
        format!("{}/{id}{}", Self::USERS, Self::POSTS)
    }

    /// `path` with the paging parameters of `request` appended.
    #[must_use]
    pub fn paginated(path: &str, request: PageRequest) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!(
            "{path}{separator}page={}&limit={}",
            request.page(),
            request.limit()
        )
    }
}
