//! Todo CRUD handlers: list, get, create, update, delete.

use crate::error::AppError;
use crate::model::TodoInput;
use crate::response::{success_created, success_ok};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    response::Response,
};

type IdPath = Result<Path<String>, PathRejection>;
type RawBody = Result<Bytes, BytesRejection>;

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("invalid id {:?}: {}", raw, e)))
}

/// Decodes regardless of Content-Type; absent or `null` fields, and a bare `null` body,
/// take their zero values.
fn decode_body(body: &Bytes) -> Result<TodoInput, AppError> {
    serde_json::from_slice::<Option<TodoInput>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let todos = state.store.list().await?;
    Ok(success_ok(todos))
}

pub async fn get(State(state): State<AppState>, path: IdPath) -> Result<Response, AppError> {
    let Path(id_str) = path?;
    let id = parse_id(&id_str)?;
    let todo = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("todo {} not found", id)))?;
    Ok(success_ok(todo))
}

pub async fn create(State(state): State<AppState>, body: RawBody) -> Result<Response, AppError> {
    let input = decode_body(&body?)?;
    let todo = state.store.create(&input.name, &input.description).await?;
    tracing::info!(id = todo.id, "todo created");
    Ok(success_created(todo))
}

pub async fn update(
    State(state): State<AppState>,
    path: IdPath,
    body: RawBody,
) -> Result<Response, AppError> {
    let Path(id_str) = path?;
    let id = parse_id(&id_str)?;
    let input = decode_body(&body?)?;
    if input.id != 0 && input.id != id {
        return Err(AppError::BadRequest("id does not match".into()));
    }
    let todo = state
        .store
        .update(id, &input.name, &input.description)
        .await?;
    Ok(success_ok(todo))
}

/// Storage failures surface as 400 here, unlike the other operations.
pub async fn delete(State(state): State<AppState>, path: IdPath) -> Result<Response, AppError> {
    let Path(id_str) = path?;
    let id = parse_id(&id_str)?;
    state.store.delete(id).await.map_err(|e| {
        tracing::error!(id, error = ?e, "todo delete failed");
        AppError::BadRequest(e.to_string())
    })?;
    Ok(success_ok(()))
}
