//! Database layer - connection pools and the two product stores
//!
//! # Design Principles
//!
//! - One pooled handle per call, released on every exit path
//! - One statement (or one ORM call) per operation, no transactions
//! - Missing rows are results (`None` / `false`), not errors

#[cfg(test)]
pub(crate) mod fake;
pub mod orm;
pub mod pool;
pub mod product_entity;
pub mod sql;
pub mod store;

use std::time::Instant;

pub use orm::OrmProductStore;
pub use pool::{create_pool, create_pool_with_options, Database};
pub use sql::{SqlProductStore, TableName};
pub use store::{ProductStore, StoreError};

/// Wall-clock milliseconds since `started`, for transaction logs.
pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
