//! Startup configuration
//!
//! Every setting is a CLI flag with an environment fallback and a
//! documented default. A `.env` file in the working directory is loaded
//! before parsing, without overriding variables already set.

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use sqlx::postgres::PgConnectOptions;

use crate::db::TableName;
use crate::http::ServerConfig;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid table name '{0}': expected a plain SQL identifier")]
    TableName(String),

    #[error("pool size must be at least 1")]
    PoolSize,

    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(#[source] sqlx::Error),
}

/// Product API server
#[derive(Parser, Debug, Clone)]
#[command(name = "product-api", version, about = "Product CRUD API (v1 raw SQL, v2 ORM)")]
pub struct Config {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "store")]
    pub db_name: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value = "5432")]
    pub db_port: u16,

    /// Maximum connections per pool
    #[arg(long, env = "DB_POOL_SIZE", default_value = "10")]
    pub db_pool_size: u32,

    /// Full connection URL; overrides the individual database fields
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Table queried by the v1 (raw SQL) API
    #[arg(long, env = "PRODUCT_TABLE", default_value = "products")]
    pub product_table: String,

    /// Address to bind to
    #[arg(long, env = "BIND_HOST", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long, env = "CORS_PERMISSIVE")]
    pub cors_permissive: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Config {
    /// Load `.env` (if any), then parse flags and environment.
    pub fn load() -> Self {
        // dotenvy doesn't overwrite existing vars
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    pub fn table(&self) -> Result<TableName, ConfigError> {
        TableName::new(&self.product_table)
            .ok_or_else(|| ConfigError::TableName(self.product_table.clone()))
    }

    pub fn pool_size(&self) -> Result<u32, ConfigError> {
        match self.db_pool_size {
            0 => Err(ConfigError::PoolSize),
            n => Ok(n),
        }
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.database_url {
            return url.parse().map_err(ConfigError::DatabaseUrl);
        }

        Ok(PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name))
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.bind, self.port),
            cors_permissive: self.cors_permissive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["product-api"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_flags() {
        let config = parse(&[
            "--db-host",
            "db.internal",
            "--db-port",
            "6543",
            "--product-table",
            "shoes",
            "--port",
            "9000",
        ]);

        assert_eq!(config.db_host, "db.internal");
        assert_eq!(config.db_port, 6543);
        assert_eq!(config.table().unwrap().as_str(), "shoes");
        assert_eq!(config.server_config().bind_addr.port(), 9000);
    }

    #[test]
    fn rejects_unsafe_table_name() {
        let config = parse(&["--product-table", "products;drop"]);
        assert!(matches!(config.table(), Err(ConfigError::TableName(_))));
    }

    #[test]
    fn rejects_zero_pool() {
        let config = parse(&["--db-pool-size", "0"]);
        assert!(matches!(config.pool_size(), Err(ConfigError::PoolSize)));
    }

    #[test]
    fn database_url_overrides_fields() {
        let config = parse(&["--database-url", "postgres://app@db.example:5433/shop"]);
        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.example");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("shop"));
    }

    #[test]
    fn bad_database_url() {
        let config = parse(&["--database-url", "not a url"]);
        assert!(matches!(
            config.connect_options(),
            Err(ConfigError::DatabaseUrl(_))
        ));
    }
}
