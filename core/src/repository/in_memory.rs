use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RepoResult, TodoRepository};
use crate::types::Todo;

type Db = Arc<RwLock<HashMap<String, Todo>>>;

/// Process-local repository keyed by id. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    db: Db,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find_all(&self) -> RepoResult<Vec<Todo>> {
        let todos = self.db.read().await;
        let mut all: Vec<Todo> = todos.values().cloned().collect();
        all.sort_by_key(|todo| todo.order);
        Ok(all)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Todo>> {
        Ok(self.db.read().await.get(id).cloned())
    }

    async fn find_by_order_excluding(
        &self,
        order: i64,
        excluding: &str,
    ) -> RepoResult<Option<Todo>> {
        let todos = self.db.read().await;
        Ok(todos
            .values()
            .find(|todo| todo.order == order && todo.id != excluding)
            .cloned())
    }

    async fn max_order(&self) -> RepoResult<Option<i64>> {
        Ok(self.db.read().await.values().map(|todo| todo.order).max())
    }

    async fn insert(&self, todo: &Todo) -> RepoResult<()> {
        self.db.write().await.insert(todo.id.clone(), todo.clone());
        Ok(())
    }

    async fn update(&self, todo: &Todo) -> RepoResult<u64> {
        let mut todos = self.db.write().await;
        match todos.get_mut(&todo.id) {
            Some(existing) => {
                *existing = todo.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &str) -> RepoResult<u64> {
        let mut todos = self.db.write().await;
        Ok(todos.remove(id).map_or(0, |_| 1))
    }

    async fn delete_completed(&self) -> RepoResult<u64> {
        let mut todos = self.db.write().await;
        let before = todos.len();
        todos.retain(|_, todo| !todo.completed);
        Ok((before - todos.len()) as u64)
    }

    async fn clear(&self) -> RepoResult<()> {
        self.db.write().await.clear();
        Ok(())
    }
}
