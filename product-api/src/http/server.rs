//! Axum server setup
//!
//! Server skeleton with:
//! - Both product API versions plus the health check
//! - Response envelope and request logging on every route
//! - Localhost-only CORS by default
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::envelope::envelope;
use super::error::ApiError;
use super::routes;
use crate::db::ProductStore;
use crate::service::{ApiVersion, ProductService};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_permissive: false,
        }
    }
}

/// Shared application state: one store per API version
#[derive(Clone)]
pub struct AppState {
    pub v1: Arc<dyn ProductStore>,
    pub v2: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(v1: Arc<dyn ProductStore>, v2: Arc<dyn ProductStore>) -> Self {
        Self { v1, v2 }
    }
}

/// Catch-all for unmatched paths and for known paths hit with an
/// unsupported method
async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Build the application router with all routes.
///
/// The envelope middleware sits outside every route, the fallback
/// included, so each response is wrapped and logged exactly once.
pub fn build_router(state: AppState) -> Router {
    let v1 = ProductService::new(state.v1, ApiVersion::V1);
    let v2 = ProductService::new(state.v2, ApiVersion::V2);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::products::router(v1))
        .merge(routes::products::router(v2))
        .method_not_allowed_fallback(route_not_found)
        .fallback(route_not_found)
        .layer(middleware::from_fn(envelope))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:8080"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:8080"),
        ])
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let db = Database::open(options, 10).await?;
/// let state = AppState::new(Arc::new(db.sql_store(&table)), Arc::new(db.orm_store()));
/// run_server(state, ServerConfig::default()).await?;
/// db.close().await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state).layer(cors_layer(config.cors_permissive));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
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
