//! Data-access contract shared by the SQL and ORM backends

use async_trait::async_trait;

use crate::models::{Product, ProductId, ProductInput};

/// Data-access fault from either backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("orm error: {0}")]
    Orm(#[from] sea_orm::DbErr),
}

/// Product persistence.
///
/// Both implementations hold a pooled handle for the duration of a single
/// call only. A missing row is never an error: reads return `None` and
/// mutations return `false`.
#[async_trait]
pub trait ProductStore: Send + Sync + 'static {
    /// All products, ordered by id ascending. Empty store yields an empty vec.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Insert a new product. The generated id is not returned.
    async fn create_product(&self, input: &ProductInput) -> Result<(), StoreError>;

    /// Replace all four fields of an existing product. `false` if no row matched.
    async fn update_product(&self, id: ProductId, input: &ProductInput) -> Result<bool, StoreError>;

    /// `false` if no row matched.
    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError>;
}
