//! Schema-valid sample users, posts, and tags for tests.
//!
//! Every builder produces a complete entity with readable defaults
//! (`test@example.com`, `Test User`, `Test Post`, ...), a fresh identifier,
//! and the current time. Overrides are applied last and always win.
//!
//! The free functions use a random [`FixtureFactory`]; tests that compare
//! whole values across runs can use [`FixtureFactory::seeded`] instead.
//!
//! # Example
//!
//! ```
//! use fixtures::{PostOverrides, create_mock_post, create_mock_posts};
//! use schemas::Patch;
//!
//! let draft = create_mock_post(PostOverrides {
//!     content: Patch::Null,
//!     ..PostOverrides::default()
//! });
//! assert_eq!(draft.content, None);
//!
//! let posts = create_mock_posts(3, Some(draft.author_id()));
//! assert!(posts.iter().all(|post| post.author_id() == draft.author_id()));
//! ```

mod factory;
mod overrides;

use schemas::{CreatePost, CreateUser, Post, Tag, User};
use uuid::Uuid;

pub use factory::{
    DEFAULT_EMAIL, DEFAULT_POST_CONTENT, DEFAULT_POST_TITLE, DEFAULT_TAG_NAME, DEFAULT_USER_NAME,
    FixtureFactory,
};
pub use overrides::{
    CreatePostOverrides, CreateUserOverrides, PostOverrides, TagOverrides, UserOverrides,
};

/// A sample user.
#[must_use]
pub fn create_mock_user(overrides: UserOverrides) -> User {
    FixtureFactory::random().user(overrides)
}

/// A sample user registration payload.
#[must_use]
pub fn create_mock_create_user(overrides: CreateUserOverrides) -> CreateUser {
    FixtureFactory::random().create_user(overrides)
}

/// `count` sample users numbered from one.
#[must_use]
pub fn create_mock_users(count: usize) -> Vec<User> {
    FixtureFactory::random().users(count)
}

/// A sample post.
#[must_use]
pub fn create_mock_post(overrides: PostOverrides) -> Post {
    FixtureFactory::random().post(overrides)
}

/// A sample post creation payload.
#[must_use]
pub fn create_mock_create_post(overrides: CreatePostOverrides) -> CreatePost {
    FixtureFactory::random().create_post(overrides)
}

/// `count` sample posts, all by `author_id` when given, otherwise each by
/// its own random author.
#[must_use]
pub fn create_mock_posts(count: usize, author_id: Option<Uuid>) -> Vec<Post> {
    FixtureFactory::random().posts(count, author_id)
}

/// A sample tag.
#[must_use]
pub fn create_mock_tag(overrides: TagOverrides) -> Tag {
    FixtureFactory::random().tag(overrides)
}
