//! Request-shaping layer
//!
//! Turns validated input into store calls and store results into the
//! API outcome. Store faults are logged with the operation name and
//! surfaced as `ApiError::Upstream`; missing rows become `NotFound`.

use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use crate::db::{ProductStore, StoreError};
use crate::http::ApiError;
use crate::models::{Product, ProductId, ProductInput};

/// API generation. Both share the external contract except for the
/// empty list: v1 answers 200 with an empty list, v2 answers 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    /// Mount point for this version's product routes.
    pub fn mount(self) -> &'static str {
        match self {
            Self::V1 => "/api/v1/product",
            Self::V2 => "/api/v2/product",
        }
    }

    fn empty_list_is_not_found(self) -> bool {
        matches!(self, Self::V2)
    }
}

/// Body of a successful list call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductList {
    pub count: usize,
    pub list: Vec<Product>,
}

/// Product operations for one API version over one store
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    version: ApiVersion,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, version: ApiVersion) -> Self {
        Self { store, version }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub async fn get_products(&self) -> Result<ProductList, ApiError> {
        let list = self
            .store
            .list_products()
            .await
            .map_err(|e| self.upstream("get_products", e))?;

        if list.is_empty() && self.version.empty_list_is_not_found() {
            return Err(ApiError::not_found("Product not found"));
        }

        Ok(ProductList {
            count: list.len(),
            list,
        })
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.store
            .get_product(id)
            .await
            .map_err(|e| self.upstream("get_product", e))?
            .ok_or_else(|| missing(id))
    }

    pub async fn add_product(&self, input: ProductInput) -> Result<String, ApiError> {
        self.store
            .create_product(&input)
            .await
            .map_err(|e| self.upstream("add_product", e))?;

        Ok(format!(
            "Added '{}' , '{}' , '{}' , '{}' to product",
            input.name, input.brand, input.price, input.stock
        ))
    }

    pub async fn edit_product(&self, id: ProductId, input: ProductInput) -> Result<String, ApiError> {
        let updated = self
            .store
            .update_product(id, &input)
            .await
            .map_err(|e| self.upstream("edit_product", e))?;

        if !updated {
            return Err(missing(id));
        }

        Ok(format!(
            "Edited '{}' , '{}' , '{}' , '{}' to product",
            input.name, input.brand, input.price, input.stock
        ))
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<String, ApiError> {
        let deleted = self
            .store
            .delete_product(id)
            .await
            .map_err(|e| self.upstream("delete_product", e))?;

        if !deleted {
            return Err(missing(id));
        }

        Ok(format!("Delete id {} successfully", id))
    }

    fn upstream(&self, operation: &'static str, err: StoreError) -> ApiError {
        error!(
            component = "product_service",
            version = ?self.version,
            operation,
            error = %err,
            "data access failed"
        );
        ApiError::Upstream(err)
    }
}

fn missing(id: ProductId) -> ApiError {
    ApiError::not_found(format!("Product with id {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fake::FakeStore;

    fn input() -> ProductInput {
        ProductInput {
            name: "Velocity Black Gum".into(),
            brand: "Compass".into(),
            price: 798000.0,
            stock: 10.0,
        }
    }

    fn service(store: &Arc<FakeStore>, version: ApiVersion) -> ProductService {
        ProductService::new(store.clone(), version)
    }

    #[tokio::test]
    async fn empty_list_differs_by_version() {
        let store = Arc::new(FakeStore::default());

        let v1 = service(&store, ApiVersion::V1).get_products().await.unwrap();
        assert_eq!(v1, ProductList { count: 0, list: vec![] });

        let v2 = service(&store, ApiVersion::V2).get_products().await.unwrap_err();
        assert!(matches!(v2, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn added_product_is_listed() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store, ApiVersion::V2);

        let msg = svc.add_product(input()).await.unwrap();
        assert_eq!(
            msg,
            "Added 'Velocity Black Gum' , 'Compass' , '798000' , '10' to product"
        );

        let products = svc.get_products().await.unwrap();
        assert_eq!(products.count, 1);
        assert_eq!(products.list[0].name, "Velocity Black Gum");
        assert_eq!(products.list[0].price, 798000.0);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store, ApiVersion::V1);
        let id = ProductId::from(999);

        assert!(matches!(svc.get_product(id).await, Err(ApiError::NotFound { .. })));
        assert!(matches!(
            svc.edit_product(id, input()).await,
            Err(ApiError::NotFound { .. })
        ));
        assert!(matches!(svc.delete_product(id).await, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store, ApiVersion::V1);
        svc.add_product(input()).await.unwrap();
        let id = ProductId::from(1);

        assert_eq!(svc.delete_product(id).await.unwrap(), "Delete id 1 successfully");
        assert!(matches!(svc.delete_product(id).await, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn edit_replaces_fields() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store, ApiVersion::V1);
        svc.add_product(input()).await.unwrap();

        let edited = ProductInput {
            stock: 4.0,
            ..input()
        };
        let msg = svc.edit_product(ProductId::from(1), edited).await.unwrap();
        assert!(msg.starts_with("Edited 'Velocity Black Gum'"));

        let product = svc.get_product(ProductId::from(1)).await.unwrap();
        assert_eq!(product.stock, 4.0);
    }

    #[tokio::test]
    async fn store_faults_are_upstream() {
        let store = Arc::new(FakeStore::failing());
        let svc = service(&store, ApiVersion::V2);

        assert!(matches!(svc.get_products().await, Err(ApiError::Upstream(_))));
        assert!(matches!(
            svc.get_product(ProductId::from(2)).await,
            Err(ApiError::Upstream(_))
        ));
        assert!(matches!(svc.add_product(input()).await, Err(ApiError::Upstream(_))));
    }
}
