//! HTTP server layer
//!
//! Axum server with:
//! - Request tracing
//! - `server` response header
//! - Graceful shutdown that closes the pool
//! - JSON error responses

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig};
