//! Health check endpoint

use axum::{routing::get, Router};

use crate::http::envelope::Envelope;

/// GET /sys/ping
async fn ping() -> Envelope<&'static str> {
    Envelope::ok("ok")
}

/// Health routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/sys/ping", get(ping))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ping_returns_ok() {
        let body = ping().await;
        assert_eq!(body.status_code, 200);
        assert_eq!(body.body_response, "ok");
    }
}
