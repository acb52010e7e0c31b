//! Axum server setup
//!
//! Server skeleton with:
//! - CORS limited to the configured client origin
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::auth::{CredentialValidator, StubCredentialValidator};
use crate::db::{ConfigError, Database};
use crate::payload::{PayloadDecryptor, PlaceholderDecryptor};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to; names are resolved at bind time
    pub host: String,

    pub port: u16,

    /// The one origin allowed by CORS
    pub allowed_origin: HeaderValue,

    /// Allow any origin (default: false)
    ///
    /// WARNING: only for local development.
    pub cors_permissive: bool,
}

impl ServerConfig {
    /// Build a configuration, validating the allowed origin.
    ///
    /// A trailing slash on the origin is dropped since browsers never send one.
    pub fn new(host: impl Into<String>, port: u16, client_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            host: host.into(),
            port,
            allowed_origin: parse_origin(client_url)?,
            cors_permissive: false,
        })
    }

    pub fn with_cors_permissive(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    pub fn bind_display(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: HeaderValue::from_static(DEFAULT_CLIENT_URL),
            cors_permissive: false,
        }
    }
}

fn parse_origin(client_url: &str) -> Result<HeaderValue, ConfigError> {
    let origin = client_url.trim().trim_end_matches('/');
    let has_host = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'));

    if !has_host {
        return Err(ConfigError::InvalidOrigin(client_url.to_owned()));
    }

    HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(client_url.to_owned()))
}

/// Shared application state
///
/// Built once at startup and handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub credentials: Arc<dyn CredentialValidator>,
    pub decryptor: Arc<dyn PayloadDecryptor>,
}

impl AppState {
    /// State with the development stubs for login and decryption.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            db,
            credentials: Arc::new(StubCredentialValidator),
            decryptor: Arc::new(PlaceholderDecryptor::default()),
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialValidator>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_decryptor(mut self, decryptor: Arc<dyn PayloadDecryptor>) -> Self {
        self.decryptor = decryptor;
        self
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    // list form: only a matching Origin is echoed back
    CorsLayer::new()
        .allow_origin([config.allowed_origin.clone()])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the application router with all routes
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::login::router())
        .merge(routes::certificates::router())
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until a shutdown signal, then close the database.
///
/// # Example
///
/// ```ignore
/// let db = connect(&database_config).await?;
/// run_server(AppState::new(db), ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    let db = Arc::clone(&state.db);
    let app = build_router(state, &config);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        origin = ?config.allowed_origin,
        "Server running on http://{}",
        local_addr
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db.close().await;
    tracing::info!("Server shutdown complete");

    served.map_err(ServerError::from)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
