//! Enriched read models that join entities together.
//!
//! Each view carries every member of its base entity at the top level plus
//! the joined members, so `PostWithAuthor` is a post object with an extra
//! `author` key.

use serde::Serialize;

use crate::post::Post;
use crate::tag::Tag;
use crate::user::User;
use crate::validation::{ObjectReader, Schema};

/// A user together with every post they wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithPosts {
    /// The user itself.
    #[serde(flatten)]
    pub user: User,
    /// Posts authored by the user.
    pub posts: Vec<Post>,
}

impl Schema for UserWithPosts {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let user = fields.flatten();
        let posts = fields.nested_list("posts");
        Some(Self {
            user: user?,
            posts: posts?,
        })
    }
}

/// A post together with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostWithAuthor {
    /// The post itself.
    #[serde(flatten)]
    pub post: Post,
    /// The authoring user.
    pub author: User,
}

impl Schema for PostWithAuthor {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let post = fields.flatten();
        let author = fields.nested("author");
        Some(Self {
            post: post?,
            author: author?,
        })
    }
}

/// A post together with its author and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostWithAuthorAndTags {
    /// The post itself.
    #[serde(flatten)]
    pub post: Post,
    /// The authoring user.
    pub author: User,
    /// Tags attached to the post.
    pub tags: Vec<Tag>,
}

impl Schema for PostWithAuthorAndTags {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let post = fields.flatten();
        let author = fields.nested("author");
        let tags = fields.nested_list("tags");
        Some(Self {
            post: post?,
            author: author?,
            tags: tags?,
        })
    }
}

crate::deserialize_via_schema!(UserWithPosts, PostWithAuthor, PostWithAuthorAndTags);
