//! Generic success envelopes.

use pagination::Paginated;
use schemas::validation::deserialize_validated;
use schemas::{ObjectReader, Schema};
use serde::{Deserialize, Deserializer, Serialize};

/// Successful result wrapped with a status flag and optional note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    /// Payload.
    pub data: T,
    /// Whether the call succeeded.
    pub success: bool,
    /// Optional note for the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope around `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            data,
            success: true,
            message: None,
        }
    }

    /// Attach a note for the caller.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Schema> Schema for ApiResponse<T> {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let data = fields.nested("data");
        let success = fields.required("success");
        let message = fields.optional("message");
        Some(Self {
            data: data?,
            success: success?,
            message: message?,
        })
    }
}

impl<'de, T: Schema> Deserialize<'de> for ApiResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}

/// [`ApiResponse`] whose payload is one page of a collection.
///
/// The paging members sit next to `data`, `success` and `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedResponse<T> {
    /// Items and paging metadata.
    #[serde(flatten)]
    pub page: Paginated<T>,
    /// Whether the call succeeded.
    pub success: bool,
    /// Optional note for the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Successful envelope around `page`.
    #[must_use]
    pub const fn ok(page: Paginated<T>) -> Self {
        Self {
            page,
            success: true,
            message: None,
        }
    }
}

impl<T: Schema> Schema for PaginatedResponse<T> {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let page = fields.flatten();
        let success = fields.required("success");
        let message = fields.optional("message");
        Some(Self {
            page: page?,
            success: success?,
            message: message?,
        })
    }
}

impl<'de, T: Schema> Deserialize<'de> for PaginatedResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagination::PageRequest;
    use rstest::rstest;
    use schemas::{IssueCode, Tag};
    use serde_json::json;

    const TAG_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    #[rstest]
    fn api_response_wire_shape() {
        let tag = Tag::validate(&json!({ "id": TAG_ID, "name": "rust" })).expect("valid tag");
        let response = ApiResponse::ok(tag).with_message("created");
        assert_eq!(
            serde_json::to_value(&response).expect("serialise response"),
            json!({
                "data": { "id": TAG_ID, "name": "rust" },
                "success": true,
                "message": "created",
            })
        );
    }

    #[rstest]
    fn paginated_response_is_flat() {
        let tag = Tag::validate(&json!({ "id": TAG_ID, "name": "rust" })).expect("valid tag");
        let page = Paginated::from_items(vec![tag], PageRequest::default());
        let wire = serde_json::to_value(PaginatedResponse::ok(page)).expect("serialise");
        assert_eq!(
            wire,
            json!({
                "data": [{ "id": TAG_ID, "name": "rust" }],
                "total": 1,
                "page": 1,
                "limit": 10,
                "success": true,
            })
        );
        let back = PaginatedResponse::<Tag>::validate(&wire).expect("round trip");
        assert_eq!(back.page.total(), 1);
    }

    #[rstest]
    fn api_response_reports_nested_paths() {
        let failure = ApiResponse::<Tag>::validate(&json!({
            "data": { "id": TAG_ID, "name": "" },
            "success": "yes",
        }))
        .expect_err("invalid response");
        assert_eq!(
            failure.issue_at("data.name").map(|issue| issue.code().clone()),
            Some(IssueCode::TooSmall { minimum: 1 })
        );
        assert!(failure.issue_at("success").is_some());
    }
}
