//! Domain core for the todo service.
//!
//! # Overview
//! `TodoStore` mediates every read and write of the todo collection. It is
//! built over a `TodoRepository` handed in by the caller, so the storage
//! engine (SQLite for the server, in-memory for tests) is an explicit
//! dependency rather than process-wide state.
//!
//! # Design
//! - Todos are listed ascending by `order`; `create` appends at
//!   `max(order) + 1`.
//! - No two live todos share an `order`; `update` rejects a move onto an
//!   occupied order with `TodoError::OrderAlreadyTaken` before writing.
//! - Lookups, deletes and updates of an unknown id fail with
//!   `TodoError::NotFound`.
//! - Storage failures pass through as `TodoError::Repository`.

pub mod error;
pub mod repository;
pub mod store;
pub mod types;

pub use error::{TodoError, TodoResult};
pub use repository::{InMemoryTodoRepository, RepoError, SqliteTodoRepository, TodoRepository};
pub use store::TodoStore;
pub use types::{Todo, UpdateTodo};
