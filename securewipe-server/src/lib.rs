//! securewipe-server: HTTP API for data-wipe certificates
//!
//! Stores certificates submitted from scanned QR payloads and lists them
//! per user. Storage goes through the [`db::Database`] trait with
//! PostgreSQL, MySQL and in-memory adapters. Login and payload decryption
//! are pluggable stubs ([`auth`], [`payload`]).

pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod payload;

pub use db::{connect, Backend, ConfigError, Database, DatabaseConfig, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
