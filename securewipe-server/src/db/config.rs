//! Database connection configuration
//!
//! A connection is described either by a single URL or by discrete
//! host/user/password/database parameters. The backend is named explicitly
//! or inferred from the URL scheme.

use std::fmt;
use std::str::FromStr;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database engine behind the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    MySql,
    /// Process-local store for development and tests
    Memory,
}

impl Backend {
    /// Infer the backend from a connection URL scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split_once("://")?.0;
        match scheme.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "mysql" | "mariadb" => Some(Self::MySql),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_owned())),
        }
    }
}

/// Discrete connection parameters
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionParts {
    pub host: String,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

// Hand-written so passwords never reach the logs.
impl fmt::Debug for ConnectionParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParts")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

/// Where to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectTarget {
    Url(String),
    Parts(ConnectionParts),
}

/// Configuration error, reported before any connection attempt
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown database backend '{0}' (expected postgres, mysql or memory)")]
    UnknownBackend(String),

    #[error("no database connection configured: set DATABASE_URL or DB_HOST")]
    MissingConnection,

    #[error("invalid allowed origin '{0}': expected an http(s) URL")]
    InvalidOrigin(String),
}

/// Resolved database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub backend: Backend,
    /// `None` only for [`Backend::Memory`]
    pub target: Option<ConnectTarget>,
    /// Require TLS without verifying the server certificate
    pub require_tls: bool,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// In-process store, no connection needed
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory,
            target: None,
            require_tls: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Resolve a configuration from optional inputs.
    ///
    /// A URL wins over discrete parts. Without an explicit backend the URL
    /// scheme decides, falling back to MySQL.
    pub fn resolve(
        backend: Option<Backend>,
        url: Option<String>,
        parts: Option<ConnectionParts>,
    ) -> Result<Self, ConfigError> {
        let url = url.filter(|u| !u.trim().is_empty());
        let parts = parts.filter(|p| !p.host.trim().is_empty());

        let backend = backend
            .or_else(|| url.as_deref().and_then(Backend::from_url))
            .unwrap_or(Backend::MySql);

        if backend == Backend::Memory {
            return Ok(Self::memory());
        }

        let target = match (url, parts) {
            (Some(url), _) => ConnectTarget::Url(url),
            (None, Some(parts)) => ConnectTarget::Parts(parts),
            (None, None) => return Err(ConfigError::MissingConnection),
        };

        Ok(Self {
            backend,
            target: Some(target),
            require_tls: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        })
    }

    pub fn with_require_tls(mut self, require_tls: bool) -> Self {
        self.require_tls = require_tls;
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }
}
