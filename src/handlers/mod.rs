//! HTTP handlers for the todo resource.

pub mod todo;
pub use todo::*;
