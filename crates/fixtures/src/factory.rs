//! Sample entity construction.
//!
//! A factory either draws identifiers from the operating system's random
//! source and stamps entities with the current time, or, when seeded, draws
//! them from a ChaCha8 stream and stamps a fixed instant. The same seed always
//! yields the same entities.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use schemas::{CreatePost, CreateUser, Email, NonEmptyText, Post, PostBody, Role, Tag, User};
use uuid::Uuid;

use crate::overrides::{
    CreatePostOverrides, CreateUserOverrides, PostOverrides, TagOverrides, UserOverrides,
};

/// Default email of sample users.
pub const DEFAULT_EMAIL: &str = "test@example.com";
/// Default name of sample users.
pub const DEFAULT_USER_NAME: &str = "Test User";
/// Default title of sample posts.
pub const DEFAULT_POST_TITLE: &str = "Test Post";
/// Default body of sample posts.
pub const DEFAULT_POST_CONTENT: &str = "Test content";
/// Default name of sample tags.
pub const DEFAULT_TAG_NAME: &str = "test-tag";

/// Seconds since the Unix epoch of 2024-01-01T00:00:00Z, the seeded clock.
const SEEDED_EPOCH_SECONDS: i64 = 1_704_067_200;

#[derive(Debug, Clone)]
enum Source {
    Random,
    Seeded {
        rng: ChaCha8Rng,
        clock: DateTime<Utc>,
    },
}

/// Builder of schema-valid sample entities.
///
/// # Example
///
/// ```
/// use fixtures::{FixtureFactory, UserOverrides};
///
/// let mut first = FixtureFactory::seeded(7);
/// let mut second = FixtureFactory::seeded(7);
/// assert_eq!(
///     first.user(UserOverrides::default()),
///     second.user(UserOverrides::default())
/// );
/// ```
#[derive(Debug, Clone)]
pub struct FixtureFactory {
    source: Source,
}

impl Default for FixtureFactory {
    fn default() -> Self {
        Self::random()
    }
}

impl FixtureFactory {
    /// Fresh v4 identifiers and the current time on every call.
    #[must_use]
    pub const fn random() -> Self {
        Self {
            source: Source::Random,
        }
    }

    /// Reproducible identifiers derived from `seed` and a fixed clock.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            source: Source::Seeded {
                rng: ChaCha8Rng::seed_from_u64(seed),
                clock: DateTime::from_timestamp(SEEDED_EPOCH_SECONDS, 0).unwrap_or_default(),
            },
        }
    }

    /// Next identifier.
    pub fn next_id(&mut self) -> Uuid {
        match &mut self.source {
            Source::Random => Uuid::new_v4(),
            Source::Seeded { rng, .. } => uuid::Builder::from_random_bytes(rng.random()).into_uuid(),
        }
    }

    /// Timestamp given to new entities.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match &self.source {
            Source::Random => Utc::now(),
            Source::Seeded { clock, .. } => *clock,
        }
    }

    /// A sample user.
    pub fn user(&mut self, overrides: UserOverrides) -> User {
        let UserOverrides {
            id,
            email,
            name,
            role,
            created_at,
            updated_at,
        } = overrides;
        let now = self.now();
        let fresh_id = self.next_id();
        User::new(
            id.unwrap_or(fresh_id),
            email.unwrap_or_else(|| known_email(DEFAULT_EMAIL)),
            name.unwrap_or_else(|| known_text(DEFAULT_USER_NAME)),
            role.unwrap_or_default(),
            created_at.unwrap_or(now),
            updated_at.unwrap_or(now),
        )
    }

    /// A sample user registration payload.
    #[must_use]
    pub fn create_user(&self, overrides: CreateUserOverrides) -> CreateUser {
        let CreateUserOverrides { email, name, role } = overrides;
        CreateUser {
            email: email.unwrap_or_else(|| known_email(DEFAULT_EMAIL)),
            name: name.unwrap_or_else(|| known_text(DEFAULT_USER_NAME)),
            role: role.unwrap_or(Role::User),
        }
    }

    /// `count` users with distinct ids, numbered from one in their email and
    /// name (`user1@example.com`, `User 1`, ...).
    pub fn users(&mut self, count: usize) -> Vec<User> {
        (1..=count)
            .map(|n| {
                self.user(UserOverrides {
                    email: Some(known_email(format!("user{n}@example.com"))),
                    name: Some(known_text(format!("User {n}"))),
                    ..UserOverrides::default()
                })
            })
            .collect()
    }

    /// A sample post.
    pub fn post(&mut self, overrides: PostOverrides) -> Post {
        let PostOverrides {
            id,
            title,
            content,
            published,
            author_id,
            created_at,
            updated_at,
        } = overrides;
        let now = self.now();
        let fresh_id = self.next_id();
        let fresh_author = self.next_id();
        let body = PostBody {
            title: title.unwrap_or_else(|| known_text(DEFAULT_POST_TITLE)),
            content: content.apply(Some(DEFAULT_POST_CONTENT.to_owned())),
            published: published.unwrap_or(false),
        };
        Post::new(
            id.unwrap_or(fresh_id),
            author_id.unwrap_or(fresh_author),
            body,
            created_at.unwrap_or(now),
            updated_at.unwrap_or(now),
        )
    }

    /// A sample post creation payload. No tags are attached by default.
    pub fn create_post(&mut self, overrides: CreatePostOverrides) -> CreatePost {
        let CreatePostOverrides {
            title,
            content,
            published,
            author_id,
            tags,
        } = overrides;
        let fresh_author = self.next_id();
        CreatePost {
            title: title.unwrap_or_else(|| known_text(DEFAULT_POST_TITLE)),
            content: content.apply(Some(DEFAULT_POST_CONTENT.to_owned())),
            published: published.unwrap_or(false),
            author_id: author_id.unwrap_or(fresh_author),
            tags,
        }
    }

    /// `count` posts with distinct ids titled `Post 1`, `Post 2`, ...
    ///
    /// With `author_id` every post belongs to that author; without it each
    /// post gets its own random author.
    pub fn posts(&mut self, count: usize, author_id: Option<Uuid>) -> Vec<Post> {
        (1..=count)
            .map(|n| {
                self.post(PostOverrides {
                    title: Some(known_text(format!("Post {n}"))),
                    author_id,
                    ..PostOverrides::default()
                })
            })
            .collect()
    }

    /// A sample tag.
    pub fn tag(&mut self, overrides: TagOverrides) -> Tag {
        let TagOverrides { id, name } = overrides;
        let fresh_id = self.next_id();
        Tag::new(
            id.unwrap_or(fresh_id),
            name.unwrap_or_else(|| known_text(DEFAULT_TAG_NAME)),
        )
    }
}

fn known_email(raw: impl Into<String>) -> Email {
    known_valid(Email::new(raw))
}

fn known_text(raw: impl Into<String>) -> NonEmptyText {
    known_valid(NonEmptyText::new(raw))
}

/// Unwrap a fixture default that is valid by construction.
fn known_valid<T, E: Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("fixture defaults must satisfy their schema: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use schemas::{Patch, Schema};

    #[fixture]
    fn factory() -> FixtureFactory {
        FixtureFactory::random()
    }

    #[rstest]
    fn user_defaults(mut factory: FixtureFactory) {
        let user = factory.user(UserOverrides::default());
        assert_eq!(user.email.as_str(), DEFAULT_EMAIL);
        assert_eq!(user.name.as_str(), DEFAULT_USER_NAME);
        assert_eq!(user.role, Role::User);
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(user.id().get_version_num(), 4);
    }

    #[rstest]
    fn overrides_win_over_defaults(mut factory: FixtureFactory) {
        let id = Uuid::new_v4();
        let user = factory.user(UserOverrides {
            id: Some(id),
            role: Some(Role::Admin),
            ..UserOverrides::default()
        });
        assert_eq!(user.id(), id);
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.email.as_str(), DEFAULT_EMAIL);
    }

    #[rstest]
    fn each_call_gets_a_fresh_id(mut factory: FixtureFactory) {
        let first = factory.tag(TagOverrides::default());
        let second = factory.tag(TagOverrides::default());
        assert_ne!(first.id(), second.id());
        assert_eq!(first.name.as_str(), DEFAULT_TAG_NAME);
    }

    #[rstest]
    fn users_are_numbered_from_one(mut factory: FixtureFactory) {
        let users = factory.users(3);
        let emails: Vec<_> = users.iter().map(|user| user.email.as_str()).collect();
        let names: Vec<_> = users.iter().map(|user| user.name.as_str()).collect();
        assert_eq!(
            emails,
            ["user1@example.com", "user2@example.com", "user3@example.com"]
        );
        assert_eq!(names, ["User 1", "User 2", "User 3"]);
        assert_ne!(users.first().map(User::id), users.last().map(User::id));
    }

    #[rstest]
    fn zero_users_is_empty(mut factory: FixtureFactory) {
        assert!(factory.users(0).is_empty());
    }

    #[rstest]
    fn post_defaults(mut factory: FixtureFactory) {
        let post = factory.post(PostOverrides::default());
        assert_eq!(post.title.as_str(), DEFAULT_POST_TITLE);
        assert_eq!(post.content.as_deref(), Some(DEFAULT_POST_CONTENT));
        assert!(!post.published);
        assert_ne!(post.id(), post.author_id());
    }

    #[rstest]
    fn null_content_override_clears_the_body(mut factory: FixtureFactory) {
        let post = factory.post(PostOverrides {
            content: Patch::Null,
            ..PostOverrides::default()
        });
        assert_eq!(post.content, None);
    }

    #[rstest]
    fn posts_share_a_pinned_author(mut factory: FixtureFactory) {
        let author = Uuid::new_v4();
        let posts = factory.posts(3, Some(author));
        assert!(posts.iter().all(|post| post.author_id() == author));
        let titles: Vec<_> = posts.iter().map(|post| post.title.as_str()).collect();
        assert_eq!(titles, ["Post 1", "Post 2", "Post 3"]);
    }

    #[rstest]
    fn posts_without_author_get_their_own(mut factory: FixtureFactory) {
        let posts = factory.posts(2, None);
        let authors: Vec<_> = posts.iter().map(Post::author_id).collect();
        assert_ne!(authors.first(), authors.last());
    }

    #[rstest]
    fn create_payload_defaults(mut factory: FixtureFactory) {
        let user = factory.create_user(CreateUserOverrides::default());
        assert_eq!(user.role, Role::User);

        let post = factory.create_post(CreatePostOverrides::default());
        assert_eq!(post.content.as_deref(), Some(DEFAULT_POST_CONTENT));
        assert_eq!(post.tags, None);
    }

    #[rstest]
    fn samples_pass_their_own_schema(mut factory: FixtureFactory) {
        let user = factory.user(UserOverrides::default());
        let user_wire = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(User::validate(&user_wire).expect("valid user"), user);

        let post = factory.post(PostOverrides::default());
        let post_wire = serde_json::to_value(&post).expect("serialise post");
        assert_eq!(Post::validate(&post_wire).expect("valid post"), post);
    }

    #[rstest]
    fn seeded_factories_repeat_themselves() {
        let mut first = FixtureFactory::seeded(42);
        let mut second = FixtureFactory::seeded(42);
        assert_eq!(first.posts(3, None), second.posts(3, None));
        assert_eq!(first.now(), second.now());
        assert_eq!(first.now().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[rstest]
    fn different_seeds_diverge() {
        let mut first = FixtureFactory::seeded(1);
        let mut second = FixtureFactory::seeded(2);
        assert_ne!(first.next_id(), second.next_id());
    }
}
