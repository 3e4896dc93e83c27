//! Field overrides accepted by the fixture builders.
//!
//! Every field left as `None` (or [`Patch::Absent`]) keeps the generated
//! default; anything set here wins.

use chrono::{DateTime, Utc};
use schemas::{Email, NonEmptyText, Patch, Role};
use uuid::Uuid;

/// Overrides for a sample [`schemas::User`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserOverrides {
    /// Identifier.
    pub id: Option<Uuid>,
    /// Contact address.
    pub email: Option<Email>,
    /// Display name.
    pub name: Option<NonEmptyText>,
    /// Privilege level.
    pub role: Option<Role>,
    /// Creation instant.
    pub created_at: Option<DateTime<Utc>>,
    /// Instant of the last change.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Overrides for a sample [`schemas::CreateUser`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserOverrides {
    /// Contact address.
    pub email: Option<Email>,
    /// Display name.
    pub name: Option<NonEmptyText>,
    /// Requested role.
    pub role: Option<Role>,
}

/// Overrides for a sample [`schemas::Post`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostOverrides {
    /// Identifier.
    pub id: Option<Uuid>,
    /// Headline.
    pub title: Option<NonEmptyText>,
    /// Body; [`Patch::Null`] produces a post without content.
    pub content: Patch<String>,
    /// Visibility flag.
    pub published: Option<bool>,
    /// Authoring user.
    pub author_id: Option<Uuid>,
    /// Creation instant.
    pub created_at: Option<DateTime<Utc>>,
    /// Instant of the last change.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Overrides for a sample [`schemas::CreatePost`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePostOverrides {
    /// Headline.
    pub title: Option<NonEmptyText>,
    /// Body; [`Patch::Null`] omits it.
    pub content: Patch<String>,
    /// Visibility flag.
    pub published: Option<bool>,
    /// Authoring user.
    pub author_id: Option<Uuid>,
    /// Tag names.
    pub tags: Option<Vec<String>>,
}

/// Overrides for a sample [`schemas::Tag`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOverrides {
    /// Identifier.
    pub id: Option<Uuid>,
    /// Label text.
    pub name: Option<NonEmptyText>,
}
