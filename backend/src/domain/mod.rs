//! Domain services and primitives.
//!
//! Purpose: hold the HTTP-agnostic parts of the service. Nothing here may
//! depend on Actix; adapters in `inbound` translate between the wire and
//! these types.
//!
//! Public surface:
//! - AppService (alias to `app::AppService`) - greeting served at the root.
//! - TraceId (alias to `trace_id::TraceId`) - request correlation identifier.

pub mod app;
pub mod trace_id;

pub use self::app::AppService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
