//! Login endpoint
//!
//! Presence checks happen here; the actual decision belongs to the
//! configured [`CredentialValidator`](crate::auth::CredentialValidator).

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::fields::optional_truthy;
use crate::http::server::AppState;
use crate::models::UserIdentity;

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password required.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";

/// Login request
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "optional_truthy")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "optional_truthy")]
    pub password: Option<String>,
}

/// Login response, success or failure
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl LoginResponse {
    fn ok(user: UserIdentity) -> Self {
        Self {
            success: true,
            user: Some(user),
            message: None,
        }
    }

    fn failed(message: &'static str) -> Self {
        Self {
            success: false,
            user: None,
            message: Some(message),
        }
    }
}

/// POST /api/login
///
/// A body that is missing or not JSON counts as having no fields.
async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> (StatusCode, Json<LoginResponse>) {
    let req = payload.map(|Json(req)| req).unwrap_or_else(|rejection| {
        tracing::debug!(%rejection, "login body not usable");
        LoginRequest::default()
    });

    let (Some(username), Some(password)) = (req.username, req.password) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(LoginResponse::failed(MISSING_CREDENTIALS_MESSAGE)),
        );
    };

    match state.credentials.validate(&username, &password) {
        Some(user) => {
            tracing::info!(user_id = %user.id, "login succeeded");
            (StatusCode::OK, Json(LoginResponse::ok(user)))
        }
        None => {
            tracing::info!(username = %username, "login rejected");
            (
                StatusCode::UNAUTHORIZED,
                Json(LoginResponse::failed(INVALID_CREDENTIALS_MESSAGE)),
            )
        }
    }
}

/// Login routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/login", post(login))
}
