//! Credential validation
//!
//! Login is routed through [`CredentialValidator`] so a real credential
//! store can replace the development stub without touching the handlers.

use crate::models::UserIdentity;

/// Identity returned by the development validator
pub const DEMO_USER_ID: &str = "user-123";
pub const DEMO_USER_NAME: &str = "Demo User";

/// Checks a username/password pair.
///
/// Handlers only call this with non-empty values. Returning `None` rejects
/// the login with 401.
pub trait CredentialValidator: Send + Sync {
    fn validate(&self, username: &str, password: &str) -> Option<UserIdentity>;
}

/// Accepts every pair and answers with a fixed demo identity.
///
/// Performs no verification at all. Only suitable for development.
#[derive(Debug, Clone, Default)]
pub struct StubCredentialValidator;

impl CredentialValidator for StubCredentialValidator {
    fn validate(&self, username: &str, _password: &str) -> Option<UserIdentity> {
        tracing::debug!(username, "stub credential validator accepting login");
        Some(UserIdentity::new(DEMO_USER_ID, DEMO_USER_NAME))
    }
}
