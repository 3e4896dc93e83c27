//! Health endpoint used by orchestration probes and the e2e suite.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, web};
use shared::{ApiError, HealthResponse};

use super::cache_control::no_store_header;
use super::error::{ApiResult, HttpError};

/// Shared liveness flag.
///
/// The service starts alive; [`HealthState::mark_unhealthy`] flips the probe
/// to `503` so load balancers drain the instance before shutdown.
#[derive(Debug)]
pub struct HealthState {
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a state that reports healthy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag the service as unhealthy so probes fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return liveness state.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// `GET /health`: `200 {"status":"ok"}` while alive, a `503` envelope once
/// draining. Responses are never cached.
///
/// # Errors
///
/// Returns a `503 Service Unavailable` [`HttpError`] after
/// [`HealthState::mark_unhealthy`].
pub async fn health(state: web::Data<HealthState>) -> ApiResult<HttpResponse> {
    if !state.is_alive() {
        return Err(HttpError::from(ApiError::service_unavailable(
            "Service is shutting down",
        )));
    }
    Ok(HttpResponse::Ok()
        .insert_header(no_store_header())
        .json(HealthResponse::ok()))
}
