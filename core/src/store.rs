//! Order-aware CRUD over a `TodoRepository`.
//!
//! # Design
//! `TodoStore` owns the only business rules of the service: new todos take
//! `max(order) + 1`, and no update may move a todo onto an order another
//! todo already holds. Both rules are a read followed by a write, so the two
//! operations that perform them share a write gate; with one store per
//! process that read/write span is atomic. Repositories that enforce a unique
//! order themselves (SQLite) cover writers outside this process.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{TodoError, TodoResult};
use crate::repository::TodoRepository;
use crate::types::{Todo, UpdateTodo};

pub struct TodoStore {
    repo: Arc<dyn TodoRepository>,
    write_gate: Mutex<()>,
}

impl TodoStore {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self {
            repo,
            write_gate: Mutex::new(()),
        }
    }

    /// All todos, ascending by `order`.
    pub async fn list_all(&self) -> TodoResult<Vec<Todo>> {
        Ok(self.repo.find_all().await?)
    }

    /// Persist a new incomplete todo at the end of the list.
    ///
    /// The caller is responsible for rejecting empty titles.
    #[instrument(skip(self, title))]
    pub async fn create(&self, title: &str) -> TodoResult<Todo> {
        let _gate = self.write_gate.lock().await;

        let last_order = self.repo.max_order().await?.unwrap_or(0);
        let next_order = last_order
            .checked_add(1)
            .ok_or(TodoError::NoOrderAfter(last_order))?;
        let todo = Todo::new(title, next_order);
        self.repo.insert(&todo).await?;

        tracing::info!(id = %todo.id, order = todo.order, "created todo");
        Ok(todo)
    }

    pub async fn get_by_id(&self, id: &str) -> TodoResult<Todo> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    /// Apply `changes` to the todo with `id` and return the result.
    ///
    /// The order conflict check runs first and nothing is written when it
    /// fails. A missing `id` is reported as `NotFound` here rather than being
    /// left for a later read to discover.
    #[instrument(skip(self, changes), fields(order = ?changes.order))]
    pub async fn update(&self, id: &str, changes: UpdateTodo) -> TodoResult<Todo> {
        let _gate = self.write_gate.lock().await;

        if let Some(order) = changes.order {
            if let Some(holder) = self.repo.find_by_order_excluding(order, id).await? {
                tracing::debug!(holder = %holder.id, order, "order already taken");
                return Err(TodoError::OrderAlreadyTaken(order));
            }
        }

        let mut todo = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        changes.apply_to(&mut todo);

        if self.repo.update(&todo).await? == 0 {
            return Err(TodoError::NotFound(id.to_string()));
        }
        tracing::info!(id, "updated todo");
        Ok(todo)
    }

    #[instrument(skip(self))]
    pub async fn delete_one(&self, id: &str) -> TodoResult<()> {
        if self.repo.delete(id).await? == 0 {
            return Err(TodoError::NotFound(id.to_string()));
        }
        tracing::info!(id, "deleted todo");
        Ok(())
    }

    pub async fn delete_all(&self) -> TodoResult<()> {
        self.repo.clear().await?;
        tracing::info!("deleted all todos");
        Ok(())
    }

    pub async fn delete_completed(&self) -> TodoResult<()> {
        let removed = self.repo.delete_completed().await?;
        tracing::info!(removed, "deleted completed todos");
        Ok(())
    }
}
