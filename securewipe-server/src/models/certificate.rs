//! Wipe certificate records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored certificate attesting that a device was wiped.
///
/// Serializes with the column names of the `certificates` table, which is
/// the wire format clients already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Certificate {
    pub id: i64,
    pub user_id: String,
    pub device_name: String,
    pub serial_number: String,
    pub wipe_method: String,
    pub status: String,
    pub wipe_date: DateTime<Utc>,
}

/// Certificate fields recovered from an encrypted QR payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDetails {
    pub device_name: String,
    pub serial_number: String,
    pub wipe_method: String,
    pub status: String,
}

/// Insert input for a certificate; the id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCertificate {
    pub user_id: String,
    pub details: CertificateDetails,
    pub wipe_date: DateTime<Utc>,
}

impl NewCertificate {
    /// Stamp `details` for `user_id` with the current time.
    pub fn now(user_id: impl Into<String>, details: CertificateDetails) -> Self {
        Self {
            user_id: user_id.into(),
            details,
            wipe_date: Utc::now(),
        }
    }

    /// Materialize the stored record once the database has assigned `id`.
    pub fn into_certificate(self, id: i64) -> Certificate {
        Certificate {
            id,
            user_id: self.user_id,
            device_name: self.details.device_name,
            serial_number: self.details.serial_number,
            wipe_method: self.details.wipe_method,
            status: self.details.status,
            wipe_date: self.wipe_date,
        }
    }
}
