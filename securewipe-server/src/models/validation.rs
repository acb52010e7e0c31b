//! Validation error types

use std::fmt;

/// Client input error, reported as 400
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields are absent or empty
    Required { fields: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { fields } => write!(f, "{} are required.", fields),
        }
    }
}

impl std::error::Error for ValidationError {}
