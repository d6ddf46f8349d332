//! In-memory store for unit tests

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::store::{ProductStore, StoreError};
use crate::models::{Product, ProductId, ProductInput};

#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<BTreeMap<i64, Product>>,
    next_id: Mutex<i64>,
    fail: bool,
}

impl FakeStore {
    /// Every call fails as if the pool could not hand out a connection.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Sql(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for FakeStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().get(&id.get()).cloned())
    }

    async fn create_product(&self, input: &ProductInput) -> Result<(), StoreError> {
        self.check()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        self.rows.lock().unwrap().insert(
            *next_id,
            Product {
                id: *next_id,
                name: input.name.clone(),
                brand: input.brand.clone(),
                price: input.price,
                stock: input.stock,
            },
        );
        Ok(())
    }

    async fn update_product(&self, id: ProductId, input: &ProductInput) -> Result<bool, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&id.get()) else {
            return Ok(false);
        };
        row.name = input.name.clone();
        row.brand = input.brand.clone();
        row.price = input.price;
        row.stock = input.stock;
        Ok(true)
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().remove(&id.get()).is_some())
    }
}
