//! API error types with IntoResponse
//!
//! Client errors carry a descriptive message. Database errors are logged
//! in full and answered with an opaque body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;
use crate::payload::DecryptError;

/// Body returned for every server-side failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

pub const UNDECRYPTABLE_MESSAGE: &str = "encryptedData could not be decrypted.";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Missing or empty input (400)
    Validation(ValidationError),

    /// Payload rejected by the decryptor (400)
    Undecryptable(DecryptError),

    /// Database error (500, logged)
    Database {
        context: &'static str,
        source: DbError,
    },
}

impl ApiError {
    /// Wrap a database error with what the handler was doing.
    ///
    /// ```ignore
    /// db.list_for_user(&id).await.map_err(ApiError::database("failed to fetch certificates"))?;
    /// ```
    pub fn database(context: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Self::Database { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(e) => {
                tracing::debug!("Rejected request: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            Self::Undecryptable(e) => {
                tracing::debug!("Rejected payload: {}", e);
                (StatusCode::BAD_REQUEST, UNDECRYPTABLE_MESSAGE.to_string())
            }
            Self::Database { context, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = %source, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DecryptError> for ApiError {
    fn from(e: DecryptError) -> Self {
        Self::Undecryptable(e)
    }
}

impl From<DbError> for ApiError {
    fn from(source: DbError) -> Self {
        Self::Database {
            context: "database operation failed",
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400_with_message() {
        let err = ApiError::Validation(ValidationError::Required {
            fields: "userId and encryptedData",
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "userId and encryptedData are required." })
        );
    }

    #[tokio::test]
    async fn database_error_is_opaque_500() {
        let err = ApiError::database("failed to add certificate")(DbError::Sqlx(
            sqlx::Error::PoolClosed,
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Internal Server Error" })
        );
    }

    #[tokio::test]
    async fn decrypt_error_hides_detail() {
        let err = ApiError::from(DecryptError::Invalid("bad tag at byte 12".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "encryptedData could not be decrypted." })
        );
    }
}
