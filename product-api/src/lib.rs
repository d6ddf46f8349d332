//! product-api: product CRUD over HTTP
//!
//! Two API versions share one external contract:
//! - `/api/v1/product` issues parameterized SQL through a `sqlx` pool
//! - `/api/v2/product` goes through the `sea-orm` client
//!
//! Every response is wrapped as `{"statusCode", "bodyResponse"}`.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod service;
pub mod tracing_setup;

pub use config::{Config, ConfigError};
pub use db::{Database, ProductStore, StoreError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
pub use service::{ApiVersion, ProductService};
