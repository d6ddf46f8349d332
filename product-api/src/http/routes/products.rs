//! Product endpoints, registered once per API version under its mount
//! path. A trailing slash reaches the same handler.
//!
//! | Method | Path    | Action         |
//! |--------|---------|----------------|
//! | GET    | `/`     | list products  |
//! | GET    | `/{id}` | get one        |
//! | POST   | `/`     | create         |
//! | PUT    | `/{id}` | replace fields |
//! | DELETE | `/{id}` | delete         |

use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidProduct};
use crate::models::Product;
use crate::service::{ProductList, ProductService};

/// GET / - list all products
#[instrument(skip_all, fields(version = ?service.version()))]
async fn list_products(
    State(service): State<ProductService>,
) -> Result<Envelope<ProductList>, ApiError> {
    let list = service.get_products().await?;
    Ok(Envelope::ok(list))
}

/// GET /{id} - get a single product
#[instrument(skip_all, fields(version = ?service.version(), id = %id))]
async fn get_product(
    State(service): State<ProductService>,
    ValidId(id): ValidId,
) -> Result<Envelope<Product>, ApiError> {
    let product = service.get_product(id).await?;
    Ok(Envelope::ok(product))
}

/// POST / - create a product
#[instrument(skip_all, fields(version = ?service.version()))]
async fn add_product(
    State(service): State<ProductService>,
    ValidProduct(input): ValidProduct,
) -> Result<Envelope<String>, ApiError> {
    let message = service.add_product(input).await?;
    Ok(Envelope::ok(message))
}

/// PUT /{id} - replace all fields of a product
#[instrument(skip_all, fields(version = ?service.version(), id = %id))]
async fn edit_product(
    State(service): State<ProductService>,
    ValidId(id): ValidId,
    ValidProduct(input): ValidProduct,
) -> Result<Envelope<String>, ApiError> {
    let message = service.edit_product(id, input).await?;
    Ok(Envelope::ok(message))
}

/// DELETE /{id} - delete a product
#[instrument(skip_all, fields(version = ?service.version(), id = %id))]
async fn delete_product(
    State(service): State<ProductService>,
    ValidId(id): ValidId,
) -> Result<Envelope<String>, ApiError> {
    let message = service.delete_product(id).await?;
    Ok(Envelope::ok(message))
}

/// Product routes bound to one version's service
pub fn router(service: ProductService) -> Router {
    let mount = service.version().mount();
    let collection = get(list_products).post(add_product);
    let item = get(get_product).put(edit_product).delete(delete_product);

    Router::new()
        .route(mount, collection.clone())
        .route(&format!("{mount}/"), collection)
        .route(&format!("{mount}/{{id}}"), item.clone())
        .route(&format!("{mount}/{{id}}/"), item)
        .with_state(service)
}
