//! Error types for `TodoStore` operations.
//!
//! # Design
//! Two domain kinds, `NotFound` and `OrderAlreadyTaken`, carry the value the
//! caller needs to render a message. Everything the storage layer reports
//! lands in `Repository` untouched; the store does not classify or retry it.

use thiserror::Error;

use crate::repository::RepoError;

pub type TodoResult<T> = Result<T, TodoError>;

/// Errors returned by `TodoStore`.
#[derive(Debug, Error)]
pub enum TodoError {
    /// No live todo has this id.
    #[error("Todo with id {0} not found")]
    NotFound(String),

    /// Another live todo already holds this order.
    #[error("Order {0} is already taken")]
    OrderAlreadyTaken(i64),

    /// The highest order in use has no successor, so nothing can be appended.
    #[error("No order is available after {0}")]
    NoOrderAfter(i64),

    /// The storage engine failed.
    #[error("storage failure: {0}")]
    Repository(#[source] RepoError),
}

impl From<RepoError> for TodoError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::OrderConflict(order) => Self::OrderAlreadyTaken(order),
            other => Self::Repository(other),
        }
    }
}
