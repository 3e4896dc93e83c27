//! Posts and their create/update payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::primitives::{NonEmptyText, Patch};
use crate::validation::{ObjectReader, Schema};

/// Authored article.
///
/// ## Invariants
/// - `id` and `author_id` are fixed at creation and are only readable.
/// - `content` is always present on the wire, possibly as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: Uuid,
    /// Headline.
    pub title: NonEmptyText,
    /// Body text, if any.
    pub content: Option<String>,
    /// Whether readers can see the post.
    pub published: bool,
    author_id: Uuid,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Instant of the last change.
    pub updated_at: DateTime<Utc>,
}

/// Parts of a [`Post`] that callers choose freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBody {
    /// Headline.
    pub title: NonEmptyText,
    /// Body text, if any.
    pub content: Option<String>,
    /// Visibility flag.
    pub published: bool,
}

impl Post {
    /// Assemble a post from already validated parts.
    #[must_use]
    pub fn new(
        id: Uuid,
        author_id: Uuid,
        body: PostBody,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let PostBody {
            title,
            content,
            published,
        } = body;
        Self {
            id,
            title,
            content,
            published,
            author_id,
            created_at,
            updated_at,
        }
    }

    /// Materialise a creation payload under `id` at instant `now`.
    ///
    /// Tag names are not part of the post itself and are handed back so the
    /// caller can link them.
    #[must_use]
    pub fn create(id: Uuid, input: CreatePost, now: DateTime<Utc>) -> (Self, Vec<String>) {
        let CreatePost {
            title,
            content,
            published,
            author_id,
            tags,
        } = input;
        let body = PostBody {
            title,
            content,
            published,
        };
        (Self::new(id, author_id, body, now, now), tags.unwrap_or_default())
    }

    /// Apply a partial update, stamping `updated_at` with `now`.
    ///
    /// Returns the replacement tag names when the update carries them.
    pub fn apply(&mut self, update: UpdatePost, now: DateTime<Utc>) -> Option<Vec<String>> {
        let UpdatePost {
            title,
            content,
            published,
            tags,
        } = update;
        if let Some(new_title) = title {
            self.title = new_title;
        }
        self.content = content.apply(self.content.take());
        if let Some(flag) = published {
            self.published = flag;
        }
        self.updated_at = now;
        tags
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Identifier of the authoring user.
    #[must_use]
    pub const fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Schema for Post {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let id = fields.required("id");
        let title = fields.required("title");
        let content = fields.nullable("content");
        let published = fields.required("published");
        let author_id = fields.required("authorId");
        let created_at = fields.required("createdAt");
        let updated_at = fields.required("updatedAt");
        Some(Self {
            id: id?,
            title: title?,
            content: content?,
            published: published?,
            author_id: author_id?,
            created_at: created_at?,
            updated_at: updated_at?,
        })
    }
}

/// Payload for writing a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    /// Headline.
    pub title: NonEmptyText,
    /// Body text; omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Visibility flag; `false` when omitted.
    pub published: bool,
    /// Authoring user.
    pub author_id: Uuid,
    /// Tag names to attach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Schema for CreatePost {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let title = fields.required("title");
        let content = fields.optional("content");
        let published = fields.defaulted("published", false);
        let author_id = fields.required("authorId");
        let tags = fields.optional("tags");
        Some(Self {
            title: title?,
            content: content?,
            published: published?,
            author_id: author_id?,
            tags: tags?,
        })
    }
}

/// Partial update of a post. Identity and authorship cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    /// Replacement headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<NonEmptyText>,
    /// Replacement body; [`Patch::Null`] clears it.
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub content: Patch<String>,
    /// Replacement visibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    /// Replacement tag names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Schema for UpdatePost {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let title = fields.optional("title");
        let content = fields.patch("content");
        let published = fields.optional("published");
        let tags = fields.optional("tags");
        Some(Self {
            title: title?,
            content: content?,
            published: published?,
            tags: tags?,
        })
    }
}

crate::deserialize_via_schema!(Post, CreatePost, UpdatePost);
