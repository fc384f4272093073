//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `CorsLayer` (static front ends call the API cross-origin)
//! 3. `TraceLayer` (request span with a `request_id` field)
//! 4. Request ID (record, propagate and echo `x-request-id`)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
