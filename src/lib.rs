//! todod: a todo CRUD service over HTTP backed by PostgreSQL.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, StartupError, StoreError};
pub use model::{Todo, TodoInput};
pub use response::{error_response, success, Envelope};
pub use routes::{app, common_routes, todo_routes};
pub use state::AppState;
pub use store::{MemoryTodoStore, PgTodoStore, TodoStore};
