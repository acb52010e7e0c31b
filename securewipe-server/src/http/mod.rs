//! HTTP server layer
//!
//! Axum server with:
//! - CORS restricted to one configured origin
//! - Request tracing
//! - Graceful shutdown, then the database is closed
//! - JSON error responses

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
