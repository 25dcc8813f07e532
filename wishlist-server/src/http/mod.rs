//! HTTP transport layer
//!
//! Axum server with:
//! - Request tracing and per-request timeout
//! - CORS (localhost only by default)
//! - Graceful shutdown with a bounded drain period
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
