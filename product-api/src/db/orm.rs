//! ORM product store (API v2)
//!
//! Same contract as the SQL store, issued through sea-orm. A
//! "record not found / not updated" fault from the ORM on update or
//! delete is a normal `false`; every other fault propagates.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use tracing::{error, info, instrument, warn};

use super::elapsed_ms;
use super::product_entity::{self as product, Entity as ProductEntity};
use super::store::{ProductStore, StoreError};
use crate::models::{Product, ProductId, ProductInput};

/// Product store backed by a shared sea-orm connection
#[derive(Clone)]
pub struct OrmProductStore {
    db: Arc<DatabaseConnection>,
}

impl OrmProductStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Faults the ORM raises when the keyed row does not exist.
fn is_record_missing(err: &DbErr) -> bool {
    matches!(err, DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated)
}

fn fault(operation: &'static str, err: DbErr) -> StoreError {
    error!(store = "orm", operation, error = %err, "orm call failed");
    StoreError::Orm(err)
}

fn active_model(input: &ProductInput) -> product::ActiveModel {
    product::ActiveModel {
        id: NotSet,
        name: Set(input.name.clone()),
        brand: Set(input.brand.clone()),
        price: Set(input.price),
        stock: Set(input.stock),
    }
}

#[async_trait]
impl ProductStore for OrmProductStore {
    #[instrument(skip_all, fields(store = "orm"))]
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let started = Instant::now();
        let rows = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| fault("list_products", e))?;

        let data: Vec<Product> = rows.into_iter().map(Product::from).collect();
        info!(
            store = "orm",
            operation = "list_products",
            elapsed_ms = elapsed_ms(started),
            ?data,
            "fetched products"
        );
        Ok(data)
    }

    #[instrument(skip(self), fields(store = "orm"))]
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let started = Instant::now();
        let data = ProductEntity::find_by_id(id.get())
            .one(self.db.as_ref())
            .await
            .map_err(|e| fault("get_product", e))?
            .map(Product::from);

        info!(
            store = "orm",
            operation = "get_product",
            elapsed_ms = elapsed_ms(started),
            ?data,
            "fetched product"
        );
        Ok(data)
    }

    #[instrument(skip_all, fields(store = "orm"))]
    async fn create_product(&self, input: &ProductInput) -> Result<(), StoreError> {
        let started = Instant::now();
        let data = active_model(input)
            .insert(self.db.as_ref())
            .await
            .map_err(|e| fault("create_product", e))?;

        info!(
            store = "orm",
            operation = "create_product",
            elapsed_ms = elapsed_ms(started),
            ?data,
            "inserted product"
        );
        Ok(())
    }

    #[instrument(skip(self, input), fields(store = "orm"))]
    async fn update_product(&self, id: ProductId, input: &ProductInput) -> Result<bool, StoreError> {
        let started = Instant::now();
        let model = product::ActiveModel {
            id: Unchanged(id.get()),
            ..active_model(input)
        };

        match model.update(self.db.as_ref()).await {
            Ok(data) => {
                info!(
                    store = "orm",
                    operation = "update_product",
                    elapsed_ms = elapsed_ms(started),
                    ?data,
                    "updated product"
                );
                Ok(true)
            }
            Err(e) if is_record_missing(&e) => {
                warn!(store = "orm", operation = "update_product", "No product entry found with id {}", id);
                Ok(false)
            }
            Err(e) => Err(fault("update_product", e)),
        }
    }

    #[instrument(skip(self), fields(store = "orm"))]
    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        let started = Instant::now();

        match ProductEntity::delete_by_id(id.get()).exec(self.db.as_ref()).await {
            Ok(result) if result.rows_affected > 0 => {
                info!(
                    store = "orm",
                    operation = "delete_product",
                    elapsed_ms = elapsed_ms(started),
                    rows_affected = result.rows_affected,
                    "deleted product"
                );
                Ok(true)
            }
            Ok(_) => {
                warn!(store = "orm", operation = "delete_product", "No product entry found with id {}", id);
                Ok(false)
            }
            Err(e) if is_record_missing(&e) => {
                warn!(store = "orm", operation = "delete_product", "No product entry found with id {}", id);
                Ok(false)
            }
            Err(e) => Err(fault("delete_product", e)),
        }
    }
}
