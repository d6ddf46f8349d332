//! Database handle: connection pools for both stores
//!
//! The handle is opened explicitly at startup, handed to the stores,
//! and closed explicitly at shutdown. Nothing here is global.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use super::orm::OrmProductStore;
use super::sql::{SqlProductStore, TableName};
use super::store::StoreError;

/// Default maximum connections for each pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Create a PostgreSQL connection pool from a URL.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/store").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url.parse()?, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with custom options.
///
/// # Arguments
///
/// * `options` - Parsed connection options
/// * `max_connections` - Maximum number of connections in the pool
pub async fn create_pool_with_options(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Owned database resources: the raw pool (v1) and the ORM client (v2).
///
/// Each side gets its own pool so the two API versions never compete
/// for the same handles.
pub struct Database {
    pool: PgPool,
    orm: Arc<DatabaseConnection>,
}

impl Database {
    /// Connect both pools.
    pub async fn open(options: PgConnectOptions, max_connections: u32) -> Result<Self, StoreError> {
        let pool = create_pool_with_options(options.clone(), max_connections).await?;
        let orm_pool = create_pool_with_options(options, max_connections).await?;
        let orm = Arc::new(SqlxPostgresConnector::from_sqlx_postgres_pool(orm_pool));

        info!(max_connections, "database pools opened");
        Ok(Self { pool, orm })
    }

    /// Store issuing raw SQL against `table`.
    pub fn sql_store(&self, table: &TableName) -> SqlProductStore {
        SqlProductStore::new(self.pool.clone(), table)
    }

    /// Store issuing calls through the ORM client.
    pub fn orm_store(&self) -> OrmProductStore {
        OrmProductStore::new(Arc::clone(&self.orm))
    }

    /// Close both pools, waiting for checked-out connections to return.
    ///
    /// Stores handed out earlier still hold the ORM connection; it is
    /// closed by reference so those clones see a closed pool.
    pub async fn close(self) -> Result<(), StoreError> {
        self.pool.close().await;
        self.orm.close_by_ref().await?;
        info!("database pools closed");
        Ok(())
    }
}
