//! HTTP server layer
//!
//! Axum server with:
//! - `/api/v1/product` (SQL store) and `/api/v2/product` (ORM store)
//! - Uniform `{statusCode, bodyResponse}` envelope
//! - Request tracing
//! - Graceful shutdown

pub mod envelope;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use envelope::Envelope;
pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
