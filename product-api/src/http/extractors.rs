//! Custom Axum extractors
//!
//! Both reject with `ApiError::Validation`, so a bad id or body becomes a
//! 400 before any handler (and any store call) runs. A numeric id that no
//! row can carry is answered with 404 the same way.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;

use super::error::ApiError;
use crate::models::{ProductId, ProductInput, ValidationError};

/// Extract and validate a product id from path
pub struct ValidId(pub ProductId);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Required { field: "id" }))?;

        match ProductId::parse(&raw)? {
            Some(id) => Ok(Self(id)),
            None => Err(ApiError::not_found(format!(
                "Product with id {} not found",
                raw.trim()
            ))),
        }
    }
}

/// Extract a JSON body and check it against the product schema
pub struct ValidProduct(pub ProductInput);

impl<S> FromRequest<S> for ValidProduct
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value): Json<Value> = Json::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::Malformed {
                reason: rejection.body_text(),
            })
        })?;

        let input = ProductInput::from_json(&value)?;
        Ok(Self(input))
    }
}
