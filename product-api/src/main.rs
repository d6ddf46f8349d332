//! product-api server binary

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use product_api::tracing_setup::{init_tracing, TracingConfig};
use product_api::http::ServerError;
use product_api::{run_server, AppState, Config, Database, StoreError};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();
    init_tracing(&TracingConfig {
        debug: config.debug,
    })?;

    let table = config.table()?;
    let options = config.connect_options()?;
    let pool_size = config.pool_size()?;

    info!(table = %table, pool_size, "Opening database");
    let db = Database::open(options, pool_size)
        .await
        .context("Failed to open database")?;

    let state = AppState::new(Arc::new(db.sql_store(&table)), Arc::new(db.orm_store()));

    // Close the pools even when the server fails
    let served = run_server(state, config.server_config()).await;
    let closed = db.close().await;
    shutdown_outcome(served, closed)
}

/// A server error wins over a close error; the close error is still logged.
fn shutdown_outcome(
    served: Result<(), ServerError>,
    closed: Result<(), StoreError>,
) -> Result<()> {
    match (served, closed) {
        (Err(served), Err(closed)) => {
            error!(error = %closed, "Failed to close database");
            Err(served).context("Server error")
        }
        (served, closed) => {
            served.context("Server error")?;
            closed.context("Failed to close database")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error() -> ServerError {
        ServerError::Io(std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken"))
    }

    fn close_error() -> StoreError {
        StoreError::Sql(sqlx::Error::PoolClosed)
    }

    #[test]
    fn server_error_survives_close_failure() {
        let err = shutdown_outcome(Err(server_error()), Err(close_error())).unwrap_err();
        assert_eq!(err.to_string(), "Server error");
        assert!(err.root_cause().to_string().contains("port taken"));
    }

    #[test]
    fn close_failure_reported_after_clean_serve() {
        let err = shutdown_outcome(Ok(()), Err(close_error())).unwrap_err();
        assert_eq!(err.to_string(), "Failed to close database");
    }

    #[test]
    fn clean_shutdown() {
        assert!(shutdown_outcome(Ok(()), Ok(())).is_ok());
    }
}
