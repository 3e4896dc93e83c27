//! Liveness probe payload.

use schemas::validation::{FieldPath, FieldValue, ValidationContext, expect_str};
use schemas::{IssueCode, ObjectReader, Schema};
use serde::Serialize;
use serde_json::Value;

/// Reported service state. Only `ok` exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The service is up.
    #[default]
    Ok,
}

impl FieldValue for HealthStatus {
    fn read(value: &Value, path: &FieldPath, cx: &mut ValidationContext) -> Option<Self> {
        match expect_str(value, path, cx)? {
            "ok" => Some(Self::Ok),
            _ => {
                cx.report(path, IssueCode::InvalidEnumValue { options: &["ok"] });
                None
            }
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// Service state.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// The healthy response.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
        }
    }
}

impl Schema for HealthResponse {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let status = fields.required("status");
        Some(Self { status: status? })
    }
}

schemas::deserialize_via_schema!(HealthResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn healthy_body_is_exactly_status_ok() {
        assert_eq!(
            serde_json::to_value(HealthResponse::ok()).expect("serialise health"),
            json!({ "status": "ok" })
        );
    }

    #[rstest]
    #[case(json!({ "status": "degraded" }))]
    #[case(json!({ "status": "ok", "uptime": 3 }))]
    #[case(json!({}))]
    fn anything_but_the_literal_is_rejected(#[case] body: Value) {
        assert!(HealthResponse::validate(&body).is_err());
    }
}
