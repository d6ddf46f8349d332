//! Response envelope stage
//!
//! Every response leaves the server as
//! `{"statusCode": <int>, "bodyResponse": <payload>}`. Handlers and
//! `ApiError` build the envelope themselves; the middleware wraps
//! whatever else reaches it (framework rejections) and logs one
//! line per request. Responses that are already enveloped carry a
//! marker extension and are never wrapped twice.

use std::time::Instant;

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// Upper bound when buffering a foreign body for re-wrapping
const MAX_WRAPPED_BODY: usize = 1024 * 1024;

/// Uniform response body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status_code: u16,
    pub body_response: T,
}

/// Marks a response as already wrapped
#[derive(Debug, Clone, Copy)]
struct Enveloped;

impl<T: Serialize> Envelope<T> {
    pub fn new(status: StatusCode, body: T) -> Self {
        Self {
            status_code: status.as_u16(),
            body_response: body,
        }
    }

    /// 200 with `body`
    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.extensions_mut().insert(Enveloped);
        response
    }
}

/// Middleware: wrap once, then log the transaction.
pub async fn envelope(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;
    let response = if response.extensions().get::<Enveloped>().is_some() {
        response
    } else {
        wrap_foreign(response).await
    };

    tracing::info!(
        target: "api_request",
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}

/// Re-wrap a response that bypassed the envelope, keeping status and headers.
async fn wrap_foreign(response: Response) -> Response {
    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_WRAPPED_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                status = parts.status.as_u16(),
                limit = MAX_WRAPPED_BODY,
                error = %e,
                "could not buffer response body, wrapping reason phrase instead"
            );
            Default::default()
        }
    };
    let reason = parts.status.canonical_reason().unwrap_or("Error");

    let payload = if bytes.is_empty() {
        Value::String(reason.to_owned())
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    let payload = if parts.status.is_success() {
        payload
    } else {
        json!({ "error": reason, "message": payload })
    };

    let mut wrapped = Envelope::new(parts.status, payload).into_response();
    for (name, value) in &parts.headers {
        if name != CONTENT_TYPE && name != CONTENT_LENGTH {
            wrapped.headers_mut().append(name.clone(), value.clone());
        }
    }
    wrapped
}
