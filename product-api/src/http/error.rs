//! API error types with IntoResponse
//!
//! `Result<T, ApiError>` is the outcome every handler returns: `Ok`,
//! `NotFound`, client error (`Validation`) or `Upstream`. Errors are
//! rendered inside the response envelope with the matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::envelope::Envelope;
use crate::db::StoreError;
use crate::models::ValidationError;

/// Message returned for 500s; fault detail stays in the logs.
const UPSTREAM_MESSAGE: &str = "An internal server error occurred";

/// Message returned by the catch-all route.
const ROUTE_NOT_FOUND_MESSAGE: &str = "No route matched with those values";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request input failed a schema check (400)
    Validation(ValidationError),

    /// Domain lookup or mutation matched no row (404)
    NotFound { message: String },

    /// No route for this method and path (404)
    RouteNotFound,

    /// Data store fault (500, detail hidden)
    Upstream(StoreError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { message } => message.clone(),
            Self::RouteNotFound => ROUTE_NOT_FOUND_MESSAGE.to_owned(),
            Self::Upstream(_) => UPSTREAM_MESSAGE.to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.message(),
        });

        Envelope::new(status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Upstream(e)
    }
}
