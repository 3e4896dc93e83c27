//! API contract shared by the backend and its clients.
//!
//! The contract is built from the domain schemas: error and success
//! envelopes, the health payload, request and response bodies for each
//! endpoint, and the table of endpoint paths.
//!
//! # Example
//!
//! ```
//! use shared::{ApiEndpoints, ApiError, HealthResponse};
//!
//! assert_eq!(ApiEndpoints::HEALTH, "/health");
//! assert_eq!(
//!     serde_json::to_string(&HealthResponse::ok()).expect("serialise health"),
//!     r#"{"status":"ok"}"#
//! );
//! assert_eq!(ApiError::not_found("missing").error(), Some("Not Found"));
//! ```

mod contract;
mod endpoints;
mod error;
mod health;
mod response;
mod utils;

pub use contract::{
    CreatePostRequest, CreatePostResponse, CreateUserRequest, CreateUserResponse,
    GetPostResponse, GetPostsResponse, GetUsersResponse, UpdatePostRequest, UpdateUserRequest,
};
pub use endpoints::ApiEndpoints;
pub use error::{
    ApiError, InvalidErrorStatus, MAX_ERROR_STATUS, MIN_ERROR_STATUS, REDACTED_MESSAGE,
};
pub use health::{HealthResponse, HealthStatus};
pub use response::{ApiResponse, PaginatedResponse};
pub use utils::{format_date, generate_id};
