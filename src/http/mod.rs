//! HTTP server module
//!
//! - Axum router with the extraction, health and version endpoints
//! - Request handlers and the JSON error envelope
//! - CORS and request tracing middleware

pub mod handlers;
pub mod routes;

pub use routes::create_router;
