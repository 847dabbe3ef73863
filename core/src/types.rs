//! Domain types for the todo service.
//!
//! # Design
//! `Todo` is both the persisted record and the value handed back to callers;
//! the HTTP layer decorates it with a `url` on the way out. `UpdateTodo` is
//! the single change-set used by both full and partial updates: every field
//! is optional, so "absent" and "zero-valued" stay distinguishable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub order: i64,
}

impl Todo {
    /// Build a fresh, not yet persisted todo with a random v4 id.
    pub fn new(title: impl Into<String>, order: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            order,
        }
    }
}

/// Field changes for an existing todo. Only the fields present are applied;
/// omitted fields remain unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl UpdateTodo {
    /// A change-set that replaces every mutable field.
    pub fn replace(title: impl Into<String>, completed: bool, order: i64) -> Self {
        Self {
            title: Some(title.into()),
            completed: Some(completed),
            order: Some(order),
        }
    }

    /// Apply the present fields to `todo` in place.
    pub fn apply_to(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(order) = self.order {
            todo.order = order;
        }
    }
}
