//! Tags attached to posts.

use serde::Serialize;
use uuid::Uuid;

use crate::primitives::NonEmptyText;
use crate::validation::{ObjectReader, Schema};

/// Label that groups posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    id: Uuid,
    /// Label text.
    pub name: NonEmptyText,
}

impl Tag {
    /// Assemble a tag from already validated parts.
    #[must_use]
    pub const fn new(id: Uuid, name: NonEmptyText) -> Self {
        Self { id, name }
    }

    /// Materialise a creation payload under `id`.
    #[must_use]
    pub fn create(id: Uuid, input: CreateTag) -> Self {
        let CreateTag { name } = input;
        Self::new(id, name)
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }
}

impl Schema for Tag {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let id = fields.required("id");
        let name = fields.required("name");
        Some(Self {
            id: id?,
            name: name?,
        })
    }
}

/// Payload for creating a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTag {
    /// Label text.
    pub name: NonEmptyText,
}

impl Schema for CreateTag {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let name = fields.required("name");
        Some(Self { name: name? })
    }
}

crate::deserialize_via_schema!(Tag, CreateTag);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::IssueCode;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn tag_wire_shape() {
        let tag = Tag::validate(&json!({
            "id": "123e4567-e89b-12d3-a456-426614174000",
            "name": "rust",
        }))
        .expect("valid tag");
        assert_eq!(
            serde_json::to_value(&tag).expect("serialise tag"),
            json!({ "id": "123e4567-e89b-12d3-a456-426614174000", "name": "rust" })
        );
    }

    #[rstest]
    #[case(json!({}), IssueCode::Required)]
    #[case(json!({ "name": "" }), IssueCode::TooSmall { minimum: 1 })]
    #[case(
        json!({ "name": 3 }),
        IssueCode::InvalidType { expected: "string", received: "number" }
    )]
    fn create_tag_name_is_checked(#[case] input: serde_json::Value, #[case] expected: IssueCode) {
        let failure = CreateTag::validate(&input).expect_err("invalid tag");
        assert_eq!(
            failure.issue_at("name").map(|issue| issue.code().clone()),
            Some(expected)
        );
    }
}
