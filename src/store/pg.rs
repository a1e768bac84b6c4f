//! PostgreSQL gateway over the `todos` table.

use super::TodoStore;
use crate::error::StoreError;
use crate::model::Todo;
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;

const LIST_SQL: &str = "SELECT id::BIGINT AS id, name, description FROM todos ORDER BY id";
const GET_SQL: &str = "SELECT id::BIGINT AS id, name, description FROM todos WHERE id = $1";
const CREATE_SQL: &str =
    "INSERT INTO todos (name, description) VALUES ($1, $2) RETURNING id::BIGINT AS id, name, description";
const UPDATE_SQL: &str =
    "UPDATE todos SET name = $1, description = $2 WHERE id = $3 RETURNING id::BIGINT AS id, name, description";
const DELETE_SQL: &str = "DELETE FROM todos WHERE id = $1";

/// Owns the pool for the process lifetime; [`PgTodoStore::close`] is called once serving stops.
#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Waits at most `within` for checked-out connections to come back.
    pub async fn close(&self, within: Duration) {
        tracing::info!("db pool closing");
        match tokio::time::timeout(within, self.pool.close()).await {
            Ok(()) => tracing::info!("db pool closed"),
            Err(_) => tracing::warn!(timeout = ?within, "could not close db pool in time"),
        }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        tracing::debug!(sql = %LIST_SQL, "query");
        let rows = sqlx::query_as::<_, Todo>(LIST_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        tracing::debug!(sql = %GET_SQL, id, "query");
        let row = sqlx::query_as::<_, Todo>(GET_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, name: &str, description: &str) -> Result<Todo, StoreError> {
        tracing::debug!(sql = %CREATE_SQL, name, description, "query");
        let row = sqlx::query_as::<_, Todo>(CREATE_SQL)
            .bind(name)
            .bind(description)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, name: &str, description: &str) -> Result<Todo, StoreError> {
        tracing::debug!(sql = %UPDATE_SQL, id, name, description, "query");
        sqlx::query_as::<_, Todo>(UPDATE_SQL)
            .bind(name)
            .bind(description)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NoRows { id })
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        tracing::debug!(sql = %DELETE_SQL, id, "query");
        sqlx::query(DELETE_SQL).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
