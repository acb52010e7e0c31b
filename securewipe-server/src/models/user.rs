//! User identity returned by login

use serde::{Deserialize, Serialize};

/// Identity of an authenticated user.
///
/// Users are not stored by this service; the identity comes straight from
/// the configured credential validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
