//! PostgreSQL adapter

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Backend, Database, DbError};
use crate::models::{Certificate, NewCertificate};

/// Certificate storage on a PostgreSQL pool
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Database for PgDatabase {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Certificate>, DbError> {
        let rows = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT id, user_id, device_name, serial_number, wipe_method, status, wipe_date
            FROM certificates
            WHERE user_id = $1
            ORDER BY wipe_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, cert: &NewCertificate) -> Result<i64, DbError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO certificates
                (user_id, device_name, serial_number, wipe_method, status, wipe_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&cert.user_id)
        .bind(&cert.details.device_name)
        .bind(&cert.details.serial_number)
        .bind(&cert.details.wipe_method)
        .bind(&cert.details.status)
        .bind(cert.wipe_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Certificate>, DbError> {
        let row = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT id, user_id, device_name, serial_number, wipe_method, status, wipe_date
            FROM certificates
            WHERE id = $1
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CertificateDetails;
    use chrono::{Duration, Utc};

    // Integration tests require a real database with schema/postgres.sql applied
    // Run with: DATABASE_URL=postgres://... cargo test -p securewipe-server -- --ignored

    async fn test_db() -> PgDatabase {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");
        PgDatabase::new(pool)
    }

    fn cert(user_id: &str, serial: &str) -> NewCertificate {
        NewCertificate::now(
            user_id,
            CertificateDetails {
                device_name: "pg test device".into(),
                serial_number: serial.into(),
                wipe_method: "NIST SP 800-88 Purge".into(),
                status: "Completed".into(),
            },
        )
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_then_get_round_trips() {
        let db = test_db().await;
        let user = format!("pg-test-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());

        let stored = db.insert_and_fetch(&cert(&user, "SN-PG1")).await.unwrap();
        assert_eq!(stored.user_id, user);
        assert_eq!(stored.serial_number, "SN-PG1");

        let fetched = db.get(stored.id).await.unwrap();
        assert_eq!(fetched.as_ref().map(|c| c.id), Some(stored.id));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_is_newest_first() {
        let db = test_db().await;
        let user = format!("pg-order-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());

        let mut older = cert(&user, "SN-OLD");
        older.wipe_date -= Duration::hours(1);
        db.insert(&older).await.unwrap();
        db.insert(&cert(&user, "SN-NEW")).await.unwrap();

        let list = db.list_for_user(&user).await.unwrap();
        let serials: Vec<_> = list.iter().map(|c| c.serial_number.as_str()).collect();
        assert_eq!(serials, ["SN-NEW", "SN-OLD"]);
    }
}
