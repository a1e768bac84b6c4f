//! In-process gateway used as a substitute for PostgreSQL in tests.

use super::TodoStore;
use crate::error::StoreError;
use crate::model::Todo;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Rows {
    last_id: i64,
    by_id: BTreeMap<i64, Todo>,
}

/// Ids start at 1 and are never reused, matching a sequence-backed primary key.
#[derive(Default)]
pub struct MemoryTodoStore {
    rows: Mutex<Rows>,
    failing: AtomicBool,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails as if the database were unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn rows(&self) -> Result<MutexGuard<'_, Rows>, StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.rows.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.rows()?.by_id.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(self.rows()?.by_id.get(&id).cloned())
    }

    async fn create(&self, name: &str, description: &str) -> Result<Todo, StoreError> {
        let mut rows = self.rows()?;
        rows.last_id += 1;
        let todo = Todo {
            id: rows.last_id,
            name: name.to_string(),
            description: description.to_string(),
        };
        rows.by_id.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: i64, name: &str, description: &str) -> Result<Todo, StoreError> {
        let mut rows = self.rows()?;
        let todo = rows.by_id.get_mut(&id).ok_or(StoreError::NoRows { id })?;
        todo.name = name.to_string();
        todo.description = description.to_string();
        Ok(todo.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.rows()?.by_id.remove(&id);
        Ok(())
    }
}
