//! Domain models
//!
//! Certificates are immutable once stored. Request validation errors live
//! here so handlers and extractors share one vocabulary.

pub mod certificate;
pub mod user;
pub mod validation;

pub use certificate::{Certificate, CertificateDetails, NewCertificate};
pub use user::UserIdentity;
pub use validation::ValidationError;
