//! Error envelope returned by every failing API call.

use http::StatusCode;
use schemas::{IssueCode, ObjectReader, Schema, ValidationFailure};
use serde::Serialize;
use thiserror::Error;

/// Message sent in place of the real one for server-side failures.
pub const REDACTED_MESSAGE: &str = "Internal server error";

/// Lowest status code an error envelope may carry.
pub const MIN_ERROR_STATUS: u16 = 400;

/// Highest status code an error envelope may carry.
pub const MAX_ERROR_STATUS: u16 = 599;

/// A status code that cannot label a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("status code {0} is not a 4xx or 5xx error status")]
pub struct InvalidErrorStatus(pub u16);

/// JSON body of a failed API call.
///
/// The status is always a client or server error, so the HTTP status and
/// the body's `statusCode` never disagree.
///
/// ```
/// use shared::ApiError;
/// use serde_json::json;
///
/// let err = ApiError::not_found("user 42 does not exist");
/// assert_eq!(
///     serde_json::to_value(&err).expect("serialise error"),
///     json!({
///         "statusCode": 404,
///         "message": "user 42 does not exist",
///         "error": "Not Found",
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{status_code} {message}")]
pub struct ApiError {
    status_code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    /// Build an error for `status`, labelled with its canonical reason.
    ///
    /// Statuses outside `4xx`/`5xx` do not describe a failure and are
    /// recorded as `500 Internal Server Error`.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let effective = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status_code: effective.as_u16(),
            message: message.into(),
            error: effective.canonical_reason().map(str::to_owned),
        }
    }

    /// Build an error from a raw status code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidErrorStatus`] unless `status_code` lies in
    /// `400..=599`.
    pub fn try_new(
        status_code: u16,
        message: impl Into<String>,
    ) -> Result<Self, InvalidErrorStatus> {
        match StatusCode::from_u16(status_code) {
            Ok(status) if status.is_client_error() || status.is_server_error() => {
                Ok(Self::new(status, message))
            }
            _ => Err(InvalidErrorStatus(status_code)),
        }
    }

    /// `400 Bad Request`.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// `401 Unauthorized`.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// `403 Forbidden`.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// `404 Not Found`.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// `409 Conflict`.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// `500 Internal Server Error`.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// `503 Service Unavailable`.
    #[must_use]
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// `400 Bad Request` listing every issue of a failed validation.
    #[must_use]
    pub fn from_validation(failure: &ValidationFailure) -> Self {
        Self::bad_request(failure.to_string())
    }

    /// Replace the error label.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// HTTP status code as carried on the wire.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Short error label, usually the reason phrase.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the failure is the server's fault.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }

    /// Copy safe to show to clients: server errors lose their message.
    #[must_use]
    pub fn redacted(&self) -> Self {
        if self.is_server_error() {
            Self::new(self.status(), REDACTED_MESSAGE)
        } else {
            self.clone()
        }
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        Self::from_validation(&failure)
    }
}

impl Schema for ApiError {
    fn read_fields(fields: &mut ObjectReader<'_>) -> Option<Self> {
        let raw_status: Option<u16> = fields.required("statusCode");
        let message = fields.required("message");
        let error = fields.optional("error");
        let status_code = raw_status?;
        if status_code < MIN_ERROR_STATUS {
            fields.report(
                "statusCode",
                IssueCode::TooSmall {
                    minimum: u64::from(MIN_ERROR_STATUS),
                },
            );
            return None;
        }
        if status_code > MAX_ERROR_STATUS {
            fields.report(
                "statusCode",
                IssueCode::TooBig {
                    maximum: u64::from(MAX_ERROR_STATUS),
                },
            );
            return None;
        }
        Some(Self {
            status_code,
            message: message?,
            error: error?,
        })
    }
}

schemas::deserialize_via_schema!(ApiError);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use schemas::CreateUser;
    use serde_json::json;

    #[rstest]
    #[case(ApiError::bad_request("x"), 400, Some("Bad Request"))]
    #[case(ApiError::unauthorized("x"), 401, Some("Unauthorized"))]
    #[case(ApiError::forbidden("x"), 403, Some("Forbidden"))]
    #[case(ApiError::not_found("x"), 404, Some("Not Found"))]
    #[case(ApiError::conflict("x"), 409, Some("Conflict"))]
    #[case(ApiError::internal("x"), 500, Some("Internal Server Error"))]
    #[case(ApiError::service_unavailable("x"), 503, Some("Service Unavailable"))]
    #[case(ApiError::new(StatusCode::IM_A_TEAPOT, "x"), 418, Some("I'm a teapot"))]
    fn constructors_carry_status_and_reason(
        #[case] err: ApiError,
        #[case] status: u16,
        #[case] reason: Option<&str>,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.status().as_u16(), status);
        assert_eq!(err.error(), reason);
    }

    #[rstest]
    #[case(StatusCode::OK)]
    #[case(StatusCode::CONTINUE)]
    #[case(StatusCode::MOVED_PERMANENTLY)]
    fn non_error_statuses_become_internal_errors(#[case] status: StatusCode) {
        let err = ApiError::new(status, "secret detail");
        assert_eq!(err.status_code(), 500);
        assert!(err.is_server_error());
        assert_eq!(err.redacted().message(), REDACTED_MESSAGE);
    }

    #[rstest]
    #[case(42)]
    #[case(200)]
    #[case(399)]
    #[case(600)]
    #[case(700)]
    fn raw_codes_outside_error_range_are_refused(#[case] code: u16) {
        assert_eq!(
            ApiError::try_new(code, "secret detail"),
            Err(InvalidErrorStatus(code))
        );
    }

    #[rstest]
    fn raw_error_codes_take_the_canonical_reason() {
        let err = ApiError::try_new(422, "bad shape").expect("error status");
        assert_eq!(err.error(), Some("Unprocessable Entity"));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[rstest]
    fn unlabelled_envelopes_omit_the_error_member() {
        let parsed = ApiError::validate(&json!({ "statusCode": 499, "message": "gone" }))
            .expect("valid envelope");
        let wire = serde_json::to_value(parsed).expect("serialise");
        assert_eq!(wire, json!({ "statusCode": 499, "message": "gone" }));
    }

    #[rstest]
    fn validation_failures_become_bad_requests() {
        let failure = CreateUser::validate(&json!({ "email": "bad" })).expect_err("invalid");
        let err = ApiError::from_validation(&failure);
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.message(),
            "validation failed: email: invalid email; name: required"
        );
    }

    #[rstest]
    fn server_errors_are_redacted() {
        let err = ApiError::internal("database password is hunter2");
        let shown = err.redacted();
        assert_eq!(shown.message(), REDACTED_MESSAGE);
        assert_eq!(shown.status_code(), 500);

        let client = ApiError::not_found("no such post");
        assert_eq!(client.redacted(), client);
    }

    #[rstest]
    fn envelope_validates_its_own_shape() {
        let parsed = ApiError::validate(&json!({
            "statusCode": 409,
            "message": "taken",
            "error": "Conflict",
        }))
        .expect("valid envelope");
        assert_eq!(parsed, ApiError::conflict("taken"));

        let failure = ApiError::validate(&json!({ "statusCode": "409", "message": "x" }))
            .expect_err("status must be numeric");
        assert!(failure.issue_at("statusCode").is_some());
    }

    #[rstest]
    #[case(200, IssueCode::TooSmall { minimum: 400 })]
    #[case(700, IssueCode::TooBig { maximum: 599 })]
    fn envelope_status_must_be_an_error(#[case] code: u16, #[case] expected: IssueCode) {
        let failure = ApiError::validate(&json!({ "statusCode": code, "message": "x" }))
            .expect_err("not an error status");
        let issue = failure.issue_at("statusCode").expect("statusCode issue");
        assert_eq!(issue.code(), &expected);
    }
}
