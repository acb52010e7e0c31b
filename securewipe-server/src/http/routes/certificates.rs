//! Certificate endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::fields::optional_truthy;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{Certificate, NewCertificate, ValidationError};

/// Submit certificate request
///
/// Fields are optional so presence can be reported as a 400 with a
/// readable message instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitCertificateRequest {
    #[serde(rename = "userId", default, deserialize_with = "optional_truthy")]
    pub user_id: Option<String>,

    #[serde(rename = "encryptedData", default, deserialize_with = "optional_truthy")]
    pub encrypted_data: Option<String>,
}

/// GET /api/certificates/{user_id} - all certificates for a user, newest first
async fn list_certificates(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Certificate>>, ApiError> {
    let certificates = state
        .db
        .list_for_user(&user_id)
        .await
        .map_err(ApiError::database("Failed to fetch certificates"))?;

    tracing::debug!(user_id = %user_id, count = certificates.len(), "listed certificates");
    Ok(Json(certificates))
}

/// POST /api/certificates - store a certificate from a scanned QR payload
///
/// A body that is missing or not JSON counts as having no fields.
async fn submit_certificate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitCertificateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Certificate>), ApiError> {
    let req = payload.map(|Json(req)| req).unwrap_or_else(|rejection| {
        tracing::debug!(%rejection, "certificate body not usable");
        SubmitCertificateRequest::default()
    });

    let (Some(user_id), Some(encrypted_data)) = (req.user_id, req.encrypted_data) else {
        return Err(ValidationError::Required {
            fields: "userId and encryptedData",
        }
        .into());
    };

    tracing::info!(
        user_id = %user_id,
        payload_len = encrypted_data.len(),
        "Received encrypted certificate data"
    );

    let details = state.decryptor.decrypt(&user_id, &encrypted_data)?;
    let certificate = state
        .db
        .insert_and_fetch(&NewCertificate::now(user_id, details))
        .await
        .map_err(ApiError::database("Failed to add certificate"))?;

    tracing::info!(
        id = certificate.id,
        user_id = %certificate.user_id,
        serial_number = %certificate.serial_number,
        "certificate stored"
    );

    Ok((StatusCode::CREATED, Json(certificate)))
}

/// Certificate routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/certificates", post(submit_certificate))
        .route("/api/certificates/{user_id}", get(list_certificates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(value: Value) -> SubmitCertificateRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_string_fields() {
        let req = parse(json!({ "userId": "user-123", "encryptedData": "QR..." }));
        assert_eq!(req.user_id.as_deref(), Some("user-123"));
        assert_eq!(req.encrypted_data.as_deref(), Some("QR..."));
    }

    #[test]
    fn numeric_user_id_becomes_string() {
        let req = parse(json!({ "userId": 42, "encryptedData": "x" }));
        assert_eq!(req.user_id.as_deref(), Some("42"));
    }

    #[test]
    fn falsy_values_are_absent() {
        let req = parse(json!({ "userId": 0, "encryptedData": "" }));
        assert!(req.user_id.is_none());
        assert!(req.encrypted_data.is_none());

        let req = parse(json!({ "userId": null, "encryptedData": false }));
        assert!(req.user_id.is_none());
        assert!(req.encrypted_data.is_none());

        let req = parse(json!({ "userId": false, "encryptedData": 0 }));
        assert!(req.user_id.is_none());
        assert!(req.encrypted_data.is_none());

        let req = parse(json!({}));
        assert!(req.user_id.is_none());
        assert!(req.encrypted_data.is_none());
    }

    #[test]
    fn truthy_non_string_user_id_is_present() {
        let req = parse(json!({ "userId": true, "encryptedData": "p" }));
        assert_eq!(req.user_id.as_deref(), Some("true"));
    }

    #[test]
    fn structured_payload_kept_as_json_text() {
        let req = parse(json!({ "userId": "u", "encryptedData": { "iv": "abc" } }));
        assert_eq!(req.encrypted_data.as_deref(), Some(r#"{"iv":"abc"}"#));
    }
}
