//! Backend library modules.
//!
//! The HTTP shell of the monorepo: a greeting at `/`, the `/health` probe,
//! a validating JSON extractor for request bodies, and the error envelope
//! responder, all wired with trace and CORS middleware.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod server;

pub use domain::TraceId;
pub use middleware::{Cors, Trace};
