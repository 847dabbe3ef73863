//! SQLite-backed repository.
//!
//! # Design
//! rusqlite is blocking, so the connection sits behind a mutex and every
//! query runs on tokio's blocking pool. Migrations are applied before the
//! repository is handed out; a connection never serves data on an older
//! schema.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::migrations::apply_migrations;
use super::{RepoError, RepoResult, TodoRepository};
use crate::types::Todo;

const TODO_SELECT_SQL: &str = r#"SELECT id, title, completed, "order" FROM todos"#;

/// Repository over a single SQLite connection.
#[derive(Debug, Clone)]
pub struct SqliteTodoRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTodoRepository {
    /// Open (or create) a database file and apply pending migrations.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let conn = Connection::open(path)?;
        let repo = Self::bootstrap(conn)?;
        tracing::info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "opened sqlite database"
        );
        Ok(repo)
    }

    /// Open a private in-memory database with the full schema.
    pub fn open_in_memory() -> RepoResult<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self::bootstrap(conn)?;
        tracing::debug!("opened in-memory sqlite database");
        Ok(repo)
    }

    fn bootstrap(mut conn: Connection) -> RepoResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> RepoResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| RepoError::Worker("sqlite connection mutex poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|err| RepoError::Worker(err.to_string()))?
    }
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
        order: row.get(3)?,
    })
}

/// Unique-index violations on `"order"` become `OrderConflict`.
fn write_error(err: rusqlite::Error, order: i64) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(code, Some(message))
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && message.contains("order") =>
        {
            RepoError::OrderConflict(order)
        }
        _ => RepoError::Sqlite(err),
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn find_all(&self) -> RepoResult<Vec<Todo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(r#"{TODO_SELECT_SQL} ORDER BY "order" ASC"#))?;
            let todos = stmt
                .query_map([], todo_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(todos)
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Todo>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let todo = conn
                .query_row(
                    &format!("{TODO_SELECT_SQL} WHERE id = ?1"),
                    params![id],
                    todo_from_row,
                )
                .optional()?;
            Ok(todo)
        })
        .await
    }

    async fn find_by_order_excluding(
        &self,
        order: i64,
        excluding: &str,
    ) -> RepoResult<Option<Todo>> {
        let excluding = excluding.to_string();
        self.with_conn(move |conn| {
            let todo = conn
                .query_row(
                    &format!(r#"{TODO_SELECT_SQL} WHERE "order" = ?1 AND id <> ?2 LIMIT 1"#),
                    params![order, excluding],
                    todo_from_row,
                )
                .optional()?;
            Ok(todo)
        })
        .await
    }

    async fn max_order(&self) -> RepoResult<Option<i64>> {
        self.with_conn(|conn| {
            let max = conn.query_row(r#"SELECT MAX("order") FROM todos"#, [], |row| {
                row.get::<_, Option<i64>>(0)
            })?;
            Ok(max)
        })
        .await
    }

    async fn insert(&self, todo: &Todo) -> RepoResult<()> {
        let todo = todo.clone();
        self.with_conn(move |conn| {
            conn.execute(
                r#"INSERT INTO todos (id, title, completed, "order") VALUES (?1, ?2, ?3, ?4)"#,
                params![todo.id, todo.title, todo.completed, todo.order],
            )
            .map_err(|err| write_error(err, todo.order))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, todo: &Todo) -> RepoResult<u64> {
        let todo = todo.clone();
        self.with_conn(move |conn| {
            let changed = conn
                .execute(
                    r#"UPDATE todos SET title = ?2, completed = ?3, "order" = ?4 WHERE id = ?1"#,
                    params![todo.id, todo.title, todo.completed, todo.order],
                )
                .map_err(|err| write_error(err, todo.order))?;
            Ok(changed as u64)
        })
        .await
    }

    async fn delete(&self, id: &str) -> RepoResult<u64> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
            Ok(changed as u64)
        })
        .await
    }

    async fn delete_completed(&self) -> RepoResult<u64> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM todos WHERE completed = 1", [])?;
            Ok(changed as u64)
        })
        .await
    }

    async fn clear(&self) -> RepoResult<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM todos", [])?;
            Ok(())
        })
        .await
    }
}
