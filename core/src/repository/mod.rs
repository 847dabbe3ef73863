//! Storage contract for todo records and its implementations.
//!
//! # Design
//! `TodoRepository` exposes plain find/insert/update/delete primitives and no
//! business rules; ordering and uniqueness decisions belong to `TodoStore`.
//! Mutating calls report how many rows they touched so the store can turn
//! "affected nothing" into a domain error.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Todo;

mod in_memory;
mod migrations;
mod sqlite;

pub use in_memory::InMemoryTodoRepository;
pub use sqlite::SqliteTodoRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failures reported by a storage engine.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },

    /// The storage layer itself rejected a duplicate order.
    #[error("order {0} violates the unique order constraint")]
    OrderConflict(i64),

    /// The blocking worker running the query was lost.
    #[error("storage worker failed: {0}")]
    Worker(String),
}

/// Durable collection of todo records.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Every record, ascending by `order`.
    async fn find_all(&self) -> RepoResult<Vec<Todo>>;

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Todo>>;

    /// A record holding `order` whose id is not `excluding`.
    async fn find_by_order_excluding(&self, order: i64, excluding: &str)
        -> RepoResult<Option<Todo>>;

    /// Highest `order` present, `None` when empty.
    async fn max_order(&self) -> RepoResult<Option<i64>>;

    async fn insert(&self, todo: &Todo) -> RepoResult<()>;

    /// Overwrite the record with `todo.id`. Returns affected rows.
    async fn update(&self, todo: &Todo) -> RepoResult<u64>;

    /// Returns affected rows.
    async fn delete(&self, id: &str) -> RepoResult<u64>;

    /// Remove every record with `completed = true`. Returns affected rows.
    async fn delete_completed(&self) -> RepoResult<u64>;

    async fn clear(&self) -> RepoResult<()>;
}
