use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use todo_core::UpdateTodo;

use crate::dto::{CreateTodo, DeleteTodosQuery, ReplaceTodo, TodoId, TodoResponse, ValidJson};
use crate::error::ApiError;
use crate::url::RequestUrl;
use crate::AppState;

pub async fn list_todos(
    State(state): State<AppState>,
    url: RequestUrl,
) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let todos = state.store.list_all().await?;
    Ok(Json(
        todos
            .into_iter()
            .map(|todo| {
                let link = url.child(&todo.id);
                TodoResponse::new(todo, link)
            })
            .collect(),
    ))
}

pub async fn create_todo(
    State(state): State<AppState>,
    url: RequestUrl,
    ValidJson(input): ValidJson<CreateTodo>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let todo = state.store.create(&input.title).await?;
    let link = url.child(&todo.id);
    Ok((StatusCode::CREATED, Json(TodoResponse::new(todo, link))))
}

/// DELETE /todos, narrowed to completed todos by `?completed=true`.
pub async fn delete_todos(
    State(state): State<AppState>,
    query: DeleteTodosQuery,
) -> Result<StatusCode, ApiError> {
    if query.completed_only() {
        state.store.delete_completed().await?;
    } else {
        state.store.delete_all().await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_todo(
    State(state): State<AppState>,
    url: RequestUrl,
    TodoId(id): TodoId,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.store.get_by_id(&id).await?;
    Ok(Json(TodoResponse::new(todo, url.current())))
}

pub async fn replace_todo(
    State(state): State<AppState>,
    url: RequestUrl,
    TodoId(id): TodoId,
    ValidJson(input): ValidJson<ReplaceTodo>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.store.update(&id, input.into()).await?;
    Ok(Json(TodoResponse::new(todo, url.current())))
}

pub async fn patch_todo(
    State(state): State<AppState>,
    url: RequestUrl,
    TodoId(id): TodoId,
    ValidJson(input): ValidJson<UpdateTodo>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.store.update(&id, input).await?;
    Ok(Json(TodoResponse::new(todo, url.current())))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<StatusCode, ApiError> {
    state.store.delete_one(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn no_route(method: Method, uri: Uri) -> ApiError {
    ApiError::NoRoute {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
