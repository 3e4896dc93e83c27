//! Validated domain schemas shared by every service in the workspace.
//!
//! Each entity is a plain struct and its validator is an implementation of
//! [`Schema`] on that same struct, so the validated output and the type can
//! never drift apart. Validation walks an untyped JSON value, collects every
//! violation with its path, and only then yields the typed value.
//!
//! # Overview
//!
//! - Entities: [`User`], [`Post`], [`Tag`]
//! - Write payloads: [`CreateUser`], [`UpdateUser`], [`CreatePost`],
//!   [`UpdatePost`], [`CreateTag`]
//! - Joined read models: [`UserWithPosts`], [`PostWithAuthor`],
//!   [`PostWithAuthorAndTags`]
//! - Constrained scalars: [`Email`], [`NonEmptyText`], [`Role`], and the
//!   three-state [`Patch`]
//!
//! `serde::Deserialize` for every schema type routes through
//! [`Schema::validate`], so a value obtained from `serde_json::from_str` has
//! already passed validation.
//!
//! # Example
//!
//! ```
//! use schemas::{Patch, Schema, UpdatePost};
//! use serde_json::json;
//!
//! let cleared = UpdatePost::validate(&json!({ "content": null })).expect("valid update");
//! assert_eq!(cleared.content, Patch::Null);
//!
//! let untouched = UpdatePost::validate(&json!({})).expect("valid update");
//! assert_eq!(untouched.content, Patch::Absent);
//! ```

mod post;
mod primitives;
mod role;
mod tag;
mod user;
pub mod validation;
mod views;

pub use post::{CreatePost, Post, PostBody, UpdatePost};
pub use primitives::{ConstraintError, Email, NonEmptyText, Patch, parse_timestamp};
pub use role::{Role, UnknownRoleError};
pub use tag::{CreateTag, Tag};
pub use user::{CreateUser, UpdateUser, User};
pub use validation::{
    FieldIssue, FieldPath, FieldValue, IssueCode, ObjectReader, PathSegment, Schema,
    UnknownKeys, ValidationContext, ValidationFailure,
};
pub use views::{PostWithAuthor, PostWithAuthorAndTags, UserWithPosts};
