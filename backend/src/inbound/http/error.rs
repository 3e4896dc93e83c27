//! HTTP adapter mapping for API errors.
//!
//! Purpose: keep the shared `ApiError` envelope free of Actix while letting
//! handlers return it and have it rendered as a consistent JSON response.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use schemas::ValidationFailure;
use shared::ApiError;
use thiserror::Error;
use tracing::error;

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Convenient result alias for HTTP handlers.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::inbound::http::{ApiResult, HttpError};
/// use shared::ApiError;
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(HttpError::from(ApiError::forbidden("nope")))
/// }
/// ```
pub type ApiResult<T> = Result<T, HttpError>;

/// An [`ApiError`] on its way to the client.
///
/// The trace identifier in scope when the error is built is captured so the
/// response can echo it even if rendering happens outside the request task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct HttpError {
    error: ApiError,
    trace_id: Option<TraceId>,
}

impl HttpError {
    /// Wrap `error`, capturing the current trace identifier.
    #[must_use]
    pub fn new(error: ApiError) -> Self {
        Self {
            error,
            trace_id: TraceId::current(),
        }
    }

    /// Attach an explicit trace identifier.
    #[must_use]
    pub const fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Envelope as built by the handler, before redaction.
    #[must_use]
    pub const fn api_error(&self) -> &ApiError {
        &self.error
    }

    /// Trace identifier echoed in the response, if any.
    #[must_use]
    pub const fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }
}

impl From<ApiError> for HttpError {
    fn from(error: ApiError) -> Self {
        Self::new(error)
    }
}

impl From<ValidationFailure> for HttpError {
    fn from(failure: ValidationFailure) -> Self {
        Self::new(ApiError::from_validation(&failure))
    }
}

impl ResponseError for HttpError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if self.error.is_server_error() {
            error!(
                status = self.error.status_code(),
                reason = self.error.message(),
                trace_id = self.trace_id.map(|id| id.to_string()),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        builder.json(self.error.redacted())
    }
}
