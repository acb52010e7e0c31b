//! HTTP server command
//!
//! Resolves configuration, connects to the database and runs the API until
//! shutdown. An unreachable database aborts startup.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use securewipe_server::db::{connect, Backend, ConnectionParts, DatabaseConfig};
use securewipe_server::http::server::{DEFAULT_CLIENT_URL, DEFAULT_HOST, DEFAULT_PORT};
use securewipe_server::payload::{PlaceholderDecryptor, DEFAULT_DEVICE_NAME, DEFAULT_SERIAL_PREFIX};
use securewipe_server::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Origin allowed by CORS (the web client URL)
    #[arg(long, env = "CLIENT_URL", default_value = DEFAULT_CLIENT_URL)]
    pub client_url: String,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database backend: postgres, mysql or memory (default: from URL scheme, else mysql)
    #[arg(long, env = "DB_BACKEND")]
    pub backend: Option<Backend>,

    /// Database connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database host (used when no connection string is given)
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long, env = "DB_PORT")]
    pub db_port: Option<u16>,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Require TLS to the database without verifying its certificate
    #[arg(long, env = "DB_REQUIRE_TLS", value_parser = clap::builder::FalseyValueParser::new())]
    pub db_require_tls: bool,

    /// Maximum pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = securewipe_server::db::config::DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Device name reported by the placeholder decryptor
    #[arg(long, env = "PLACEHOLDER_DEVICE_NAME", default_value = DEFAULT_DEVICE_NAME)]
    pub device_name: String,

    /// Serial number prefix used by the placeholder decryptor
    #[arg(long, env = "PLACEHOLDER_SERIAL_PREFIX", default_value = DEFAULT_SERIAL_PREFIX)]
    pub serial_prefix: String,
}

impl ServeArgs {
    fn server_config(&self) -> Result<ServerConfig> {
        let config = ServerConfig::new(self.host.clone(), self.port, &self.client_url)?
            .with_cors_permissive(self.cors_permissive);
        Ok(config)
    }

    fn database_config(&self) -> Result<DatabaseConfig> {
        let parts = self.db_host.clone().map(|host| ConnectionParts {
            host,
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
        });

        let config = DatabaseConfig::resolve(self.backend, self.database_url.clone(), parts)?
            .with_require_tls(self.db_require_tls)
            .with_max_connections(self.max_connections);
        Ok(config)
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    // Validate everything before touching the network
    let server_config = args.server_config().context("Invalid server configuration")?;
    let database_config = args
        .database_config()
        .context("Invalid database configuration")?;

    tracing::info!("Starting SecureWipe API on {}", server_config.bind_display());
    tracing::info!(backend = %database_config.backend, "Connecting to database");
    let db = connect(&database_config)
        .await
        .with_context(|| format!("Error connecting to the {} database", database_config.backend))?;
    tracing::info!(backend = %db.backend(), "Successfully connected to the database");

    let decryptor = PlaceholderDecryptor::new(args.device_name, args.serial_prefix);
    let state = AppState::new(db).with_decryptor(Arc::new(decryptor));

    // Run server (blocks until shutdown)
    run_server(state, server_config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use securewipe_server::db::ConnectTarget;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        serve: ServeArgs,
    }

    fn parse(args: &[&str]) -> ServeArgs {
        let argv = std::iter::once("securewipe").chain(args.iter().copied());
        TestCli::parse_from(argv).serve
    }

    #[test]
    fn explicit_flags_build_configs() {
        let args = parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--client-url",
            "https://client.example.com",
            "--database-url",
            "postgres://wipe@localhost/securewipe",
            "--max-connections",
            "3",
        ]);

        let server = args.server_config().unwrap();
        assert_eq!(server.bind_display(), "127.0.0.1:8080");
        assert_eq!(server.allowed_origin, "https://client.example.com");

        let db = args.database_config().unwrap();
        assert_eq!(db.backend, Backend::Postgres);
        assert_eq!(db.max_connections, 3);
        assert!(matches!(db.target, Some(ConnectTarget::Url(_))));
    }

    #[test]
    fn discrete_parts_become_mysql_target() {
        let args = parse(&[
            "--database-url",
            "",
            "--db-host",
            "db.internal",
            "--db-user",
            "wipe",
            "--db-password",
            "secret",
            "--db-name",
            "securewipe",
        ]);

        let db = args.database_config().unwrap();
        assert_eq!(db.backend, Backend::MySql);
        match db.target {
            Some(ConnectTarget::Parts(parts)) => {
                assert_eq!(parts.host, "db.internal");
                assert_eq!(parts.password.as_deref(), Some("secret"));
            }
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn memory_backend_needs_nothing() {
        let args = parse(&["--backend", "memory"]);
        assert_eq!(args.database_config().unwrap().backend, Backend::Memory);
    }

    #[test]
    fn require_tls_flag_sets_tls() {
        let args = parse(&["--backend", "memory", "--db-require-tls"]);
        assert!(args.database_config().unwrap().require_tls);
    }

    #[test]
    fn bad_origin_rejected() {
        let args = parse(&["--client-url", "not-a-url"]);
        assert!(args.server_config().is_err());
    }
}
