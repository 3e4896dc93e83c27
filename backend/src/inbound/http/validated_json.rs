//! JSON body extractor that runs schema validation before the handler.
//!
//! Actix's own `web::Json` stops at the first serde error. This extractor
//! reads the raw body and hands it to [`Schema::validate_json_with`], so a
//! rejected request reports every violation in a single `400` envelope.

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use schemas::{Schema, UnknownKeys};
use shared::ApiError;
use tracing::debug;

use super::error::HttpError;

/// Request-body policy for [`ValidatedJson`], registered with
/// `App::app_data`. Without one, undeclared members are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonValidationConfig {
    /// What to do with members the schema does not declare.
    pub unknown_keys: UnknownKeys,
}

impl JsonValidationConfig {
    /// Drop undeclared members instead of rejecting them.
    #[must_use]
    pub const fn stripping() -> Self {
        Self {
            unknown_keys: UnknownKeys::Strip,
        }
    }
}

/// A request body that passed validation against `T`'s schema.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::inbound::http::ValidatedJson;
/// use schemas::CreateUser;
///
/// async fn register(body: ValidatedJson<CreateUser>) -> HttpResponse {
///     HttpResponse::Created().body(body.name.to_string())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    /// Unwrap the validated value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Schema + 'static> FromRequest for ValidatedJson<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let policy = req
            .app_data::<JsonValidationConfig>()
            .copied()
            .unwrap_or_default();
        let body = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let bytes = body.await.map_err(|err| {
                let status = err.as_response_error().status_code().as_u16();
                let envelope = ApiError::try_new(status, err.to_string())
                    .unwrap_or_else(|_| ApiError::bad_request(err.to_string()));
                HttpError::from(envelope)
            })?;
            let text = std::str::from_utf8(&bytes).map_err(|_| {
                HttpError::from(ApiError::bad_request("request body is not valid UTF-8"))
            })?;
            match T::validate_json_with(text, policy.unknown_keys) {
                Ok(value) => Ok(Self(value)),
                Err(failure) => {
                    debug!(issues = failure.issues().len(), "request body rejected");
                    Err(HttpError::from(failure).into())
                }
            }
        })
    }
}
