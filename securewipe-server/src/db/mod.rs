//! Database layer - connection pool and certificate storage
//!
//! Handlers only see the [`Database`] trait. Each engine gets an adapter
//! that owns its pool and its SQL dialect:
//!
//! - [`PgDatabase`]: `$n` placeholders, id from `RETURNING`
//! - [`MySqlDatabase`]: `?` placeholders, id from `LAST_INSERT_ID()`
//! - [`MemoryDatabase`]: process-local, for development and tests
//!
//! Inserts and the follow-up read are separate statements; there are no
//! transactions and no retries.

pub mod config;
pub mod memory;
pub mod mysql;
pub mod pool;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{Certificate, NewCertificate};

pub use config::{Backend, ConfigError, ConnectTarget, ConnectionParts, DatabaseConfig};
pub use memory::MemoryDatabase;
pub use mysql::MySqlDatabase;
pub use pool::connect;
pub use postgres::PgDatabase;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("certificate {id} was inserted but could not be read back")]
    MissingRow { id: i64 },

    #[error("generated id {0} does not fit in i64")]
    InvalidId(u64),
}

/// Certificate storage capability
#[async_trait]
pub trait Database: Send + Sync {
    fn backend(&self) -> Backend;

    /// All certificates owned by `user_id`, newest `wipe_date` first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Certificate>, DbError>;

    /// Insert a certificate and return its generated id.
    async fn insert(&self, cert: &NewCertificate) -> Result<i64, DbError>;

    async fn get(&self, id: i64) -> Result<Option<Certificate>, DbError>;

    /// Release pooled connections. Called once after the server drains.
    async fn close(&self);

    /// Insert, then re-read the stored row by its new id.
    async fn insert_and_fetch(&self, cert: &NewCertificate) -> Result<Certificate, DbError> {
        let id = self.insert(cert).await?;
        self.get(id).await?.ok_or(DbError::MissingRow { id })
    }
}
