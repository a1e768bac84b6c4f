//! Router assembly: health check, todo resource, request logging and body limit.

mod common;
mod todo;

pub use common::common_routes;
pub use todo::{todo_routes, TODO_PREFIX};

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Enforced by the `Bytes` extractor, so an oversized body is rejected inside the handler
/// and answered with the error envelope.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .merge(todo_routes(state))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
