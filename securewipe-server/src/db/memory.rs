//! In-memory adapter for development and tests

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Backend, Database, DbError};
use crate::models::{Certificate, NewCertificate};

#[derive(Default)]
struct Store {
    last_id: i64,
    rows: Vec<Certificate>,
}

/// Certificates held in process memory; lost on exit.
///
/// Ids start at 1 and increase like an auto-increment column.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    store: Arc<RwLock<Store>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored certificates across all users
    pub async fn len(&self) -> usize {
        self.store.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Certificate>, DbError> {
        let store = self.store.read().await;
        let mut rows: Vec<Certificate> = store
            .rows
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        // newest first; later inserts win ties
        rows.sort_by(|a, b| b.wipe_date.cmp(&a.wipe_date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn insert(&self, cert: &NewCertificate) -> Result<i64, DbError> {
        let mut store = self.store.write().await;
        store.last_id += 1;
        let id = store.last_id;
        store.rows.push(cert.clone().into_certificate(id));
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Certificate>, DbError> {
        let store = self.store.read().await;
        Ok(store.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CertificateDetails;
    use chrono::{Duration, Utc};

    fn cert(user_id: &str, serial: &str, age_minutes: i64) -> NewCertificate {
        NewCertificate {
            user_id: user_id.into(),
            details: CertificateDetails {
                device_name: "Test Device".into(),
                serial_number: serial.into(),
                wipe_method: "NIST SP 800-88 Purge".into(),
                status: "Completed".into(),
            },
            wipe_date: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn ids_increase_from_one() {
        let db = MemoryDatabase::new();
        assert_eq!(db.insert(&cert("u", "a", 0)).await.unwrap(), 1);
        assert_eq!(db.insert(&cert("u", "b", 0)).await.unwrap(), 2);
        assert_eq!(db.len().await, 2);
    }

    #[tokio::test]
    async fn list_filters_and_orders() {
        let db = MemoryDatabase::new();
        db.insert(&cert("alice", "middle", 10)).await.unwrap();
        db.insert(&cert("bob", "other", 0)).await.unwrap();
        db.insert(&cert("alice", "oldest", 30)).await.unwrap();
        db.insert(&cert("alice", "newest", 1)).await.unwrap();

        let list = db.list_for_user("alice").await.unwrap();
        let serials: Vec<_> = list.iter().map(|c| c.serial_number.as_str()).collect();
        assert_eq!(serials, ["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn unknown_user_is_empty() {
        let db = MemoryDatabase::new();
        db.insert(&cert("alice", "a", 0)).await.unwrap();
        assert!(db.list_for_user("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_and_fetch_returns_stored_row() {
        let db = MemoryDatabase::new();
        let stored = db.insert_and_fetch(&cert("alice", "SN-1", 0)).await.unwrap();

        assert_eq!(stored.id, 1);
        assert_eq!(db.get(1).await.unwrap(), Some(stored));
        assert_eq!(db.get(99).await.unwrap(), None);
    }
}
