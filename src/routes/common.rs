//! Liveness check, mounted outside the resource prefix.

use axum::{routing::get, Router};

async fn healthz() -> &'static str {
    "OK"
}

/// GET /healthz: plain-text `OK`, no dependency checks.
pub fn common_routes() -> Router {
    Router::new().route("/healthz", get(healthz))
}
