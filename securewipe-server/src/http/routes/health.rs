//! Health check endpoint

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

pub const HEALTH_MESSAGE: &str = "SecureWipe API is running!";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

/// GET /api
///
/// Never touches the database.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE,
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_message() {
        let Json(body) = health().await;
        assert_eq!(body.message, "SecureWipe API is running!");
    }
}
