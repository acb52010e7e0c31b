//! MySQL adapter

use async_trait::async_trait;
use sqlx::MySqlPool;

use super::{Backend, Database, DbError};
use crate::models::{Certificate, NewCertificate};

/// Certificate storage on a MySQL pool
#[derive(Clone)]
pub struct MySqlDatabase {
    pool: MySqlPool,
}

impl MySqlDatabase {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Database for MySqlDatabase {
    fn backend(&self) -> Backend {
        Backend::MySql
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Certificate>, DbError> {
        let rows = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT id, user_id, device_name, serial_number, wipe_method, status, wipe_date
            FROM certificates
            WHERE user_id = ?
            ORDER BY wipe_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, cert: &NewCertificate) -> Result<i64, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO certificates
                (user_id, device_name, serial_number, wipe_method, status, wipe_date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&cert.user_id)
        .bind(&cert.details.device_name)
        .bind(&cert.details.serial_number)
        .bind(&cert.details.wipe_method)
        .bind(&cert.details.status)
        .bind(cert.wipe_date)
        .execute(&self.pool)
        .await?;

        generated_id(result.last_insert_id())
    }

    async fn get(&self, id: i64) -> Result<Option<Certificate>, DbError> {
        let row = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT id, user_id, device_name, serial_number, wipe_method, status, wipe_date
            FROM certificates
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// `AUTO_INCREMENT` ids are unsigned; stored ids are `i64`.
fn generated_id(id: u64) -> Result<i64, DbError> {
    i64::try_from(id).map_err(|_| DbError::InvalidId(id))
}
