//! Database connection pool management
//!
//! Builds the pool for the configured backend and wraps it in its adapter.
//! The pool connects eagerly so an unreachable database fails startup
//! instead of the first request.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlSslMode};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

use super::{
    Backend, ConnectTarget, ConnectionParts, Database, DatabaseConfig, DbError, MemoryDatabase,
    MySqlDatabase, PgDatabase,
};

/// Connect to the configured database.
///
/// # Errors
///
/// Returns an error if the connection options are invalid or the first
/// connection cannot be established.
///
/// # Example
///
/// ```ignore
/// let config = DatabaseConfig::resolve(None, Some(url), None)?;
/// let db = connect(&config).await?;
/// ```
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Database>, DbError> {
    match (config.backend, &config.target) {
        (Backend::Memory, _) => Ok(Arc::new(MemoryDatabase::new())),
        (Backend::Postgres, Some(target)) => {
            let mut options = pg_options(target)?;
            if config.require_tls {
                options = options.ssl_mode(PgSslMode::Require);
            }
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?;
            Ok(Arc::new(PgDatabase::new(pool)))
        }
        (Backend::MySql, Some(target)) => {
            let mut options = mysql_options(target)?;
            if config.require_tls {
                options = options.ssl_mode(MySqlSslMode::Required);
            }
            let pool = MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?;
            Ok(Arc::new(MySqlDatabase::new(pool)))
        }
        (backend, None) => Err(DbError::Sqlx(sqlx::Error::Configuration(
            format!("no connection target for {} backend", backend).into(),
        ))),
    }
}

fn pg_options(target: &ConnectTarget) -> Result<PgConnectOptions, sqlx::Error> {
    match target {
        ConnectTarget::Url(url) => PgConnectOptions::from_str(url),
        ConnectTarget::Parts(parts) => {
            let ConnectionParts {
                host,
                port,
                user,
                password,
                database,
            } = parts;
            let mut options = PgConnectOptions::new().host(host);
            if let Some(port) = port {
                options = options.port(*port);
            }
            if let Some(user) = user {
                options = options.username(user);
            }
            if let Some(password) = password {
                options = options.password(password);
            }
            if let Some(database) = database {
                options = options.database(database);
            }
            Ok(options)
        }
    }
}

fn mysql_options(target: &ConnectTarget) -> Result<MySqlConnectOptions, sqlx::Error> {
    match target {
        ConnectTarget::Url(url) => MySqlConnectOptions::from_str(url),
        ConnectTarget::Parts(parts) => {
            let ConnectionParts {
                host,
                port,
                user,
                password,
                database,
            } = parts;
            let mut options = MySqlConnectOptions::new().host(host);
            if let Some(port) = port {
                options = options.port(*port);
            }
            if let Some(user) = user {
                options = options.username(user);
            }
            if let Some(password) = password {
                options = options.password(password);
            }
            if let Some(database) = database {
                options = options.database(database);
            }
            Ok(options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> ConnectionParts {
        ConnectionParts {
            host: "db.internal".into(),
            port: Some(6543),
            user: Some("wipe".into()),
            password: Some("secret".into()),
            database: Some("securewipe".into()),
        }
    }

    #[tokio::test]
    async fn memory_backend_connects_without_target() {
        let db = connect(&DatabaseConfig::memory()).await.unwrap();
        assert_eq!(db.backend(), Backend::Memory);
        assert!(db.list_for_user("anyone").await.unwrap().is_empty());
    }

    #[test]
    fn pg_options_from_parts() {
        let options = pg_options(&ConnectTarget::Parts(parts())).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "wipe");
        assert_eq!(options.get_database(), Some("securewipe"));
    }

    #[test]
    fn pg_options_reject_bad_url() {
        assert!(pg_options(&ConnectTarget::Url("postgres://host:notaport/db".into())).is_err());
    }

    #[test]
    fn mysql_options_from_url() {
        assert!(mysql_options(&ConnectTarget::Url("mysql://wipe:pw@localhost:3306/securewipe".into())).is_ok());
        assert!(mysql_options(&ConnectTarget::Parts(parts())).is_ok());
    }

    #[tokio::test]
    async fn missing_target_is_error() {
        let config = DatabaseConfig {
            backend: Backend::Postgres,
            target: None,
            require_tls: false,
            max_connections: 1,
        };
        assert!(connect(&config).await.is_err());
    }
}
