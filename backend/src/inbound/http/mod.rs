//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod error;
pub mod fallback;
pub mod health;
pub mod root;
pub mod validated_json;

pub use error::{ApiResult, HttpError};
pub use validated_json::{JsonValidationConfig, ValidatedJson};
