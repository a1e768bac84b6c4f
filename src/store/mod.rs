//! Persistence gateway for todos. One statement per operation.

mod memory;
mod pg;

pub use memory::MemoryTodoStore;
pub use pg::PgTodoStore;

use crate::error::StoreError;
use crate::model::Todo;
use async_trait::async_trait;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All rows ordered by id. Empty when the table is empty.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    /// `None` when no row has `id`.
    async fn get(&self, id: i64) -> Result<Option<Todo>, StoreError>;

    /// Inserts a row and returns it with the assigned id.
    async fn create(&self, name: &str, description: &str) -> Result<Todo, StoreError>;

    /// Fails with [`StoreError::NoRows`] when no row has `id`.
    async fn update(&self, id: i64, name: &str, description: &str) -> Result<Todo, StoreError>;

    /// Deleting a missing id succeeds.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
