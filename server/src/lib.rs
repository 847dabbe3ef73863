//! HTTP front end for `todo_core::TodoStore`.
//!
//! # Overview
//! An axum router exposing the todo collection as a JSON REST API:
//!
//! | route | store operation |
//! |---|---|
//! | `GET /todos` | `list_all` |
//! | `POST /todos` | `create` |
//! | `DELETE /todos[?completed=true]` | `delete_all` / `delete_completed` |
//! | `GET /todos/{id}` | `get_by_id` |
//! | `PUT /todos/{id}`, `PATCH /todos/{id}` | `update` |
//! | `DELETE /todos/{id}` | `delete_one` |
//!
//! Responses carry an absolute `url` per todo; errors use the
//! `{"statusCode", "message"}` body from `dto::ErrorBody`.

use std::future::Future;
use std::sync::Arc;

use axum::{routing::get, Router};
use todo_core::{InMemoryTodoRepository, TodoStore};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod dto;
pub mod error;
mod handlers;
pub mod logging;
pub mod url;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TodoStore>,
    /// Scheme used for response links when no proxy header overrides it.
    pub public_scheme: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<TodoStore>, public_scheme: &str) -> Self {
        Self {
            store,
            public_scheme: Arc::from(public_scheme),
        }
    }

    /// A fresh in-memory store linked over plain http.
    pub fn in_memory() -> Self {
        let store = TodoStore::new(Arc::new(InMemoryTodoRepository::new()));
        Self::new(Arc::new(store), "http")
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/todos",
            get(handlers::list_todos)
                .post(handlers::create_todo)
                .delete(handlers::delete_todos),
        )
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::replace_todo)
                .patch(handlers::patch_todo)
                .delete(handlers::delete_todo),
        )
        .fallback(handlers::no_route)
        .method_not_allowed_fallback(handlers::no_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app(state)` on `listener` until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
