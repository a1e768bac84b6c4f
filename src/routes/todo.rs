//! Todo resource routes under `/todo`.

use crate::handlers::todo;
use crate::state::AppState;
use axum::{routing::get, Router};

pub const TODO_PREFIX: &str = "/todo";

/// The collection is reachable both with and without a trailing slash.
pub fn todo_routes(state: AppState) -> Router {
    Router::new()
        .route(TODO_PREFIX, get(todo::list).post(todo::create))
        .route(&format!("{}/", TODO_PREFIX), get(todo::list).post(todo::create))
        .route(
            &format!("{}/:id", TODO_PREFIX),
            get(todo::get).put(todo::update).delete(todo::delete),
        )
        .with_state(state)
}
