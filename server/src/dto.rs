//! Request and response bodies for the HTTP API.
//!
//! # Design
//! Request payloads are validated by the `ValidJson` extractor before a
//! handler runs, so `TodoStore` only ever sees well-formed input. PUT and
//! PATCH both end up as a `todo_core::UpdateTodo`; PUT simply requires every
//! field to be present.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::Uri;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use todo_core::{Todo, UpdateTodo};

use crate::error::ApiError;

/// Checks a deserialized payload, returning a client-facing message on failure.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn require_title(title: &str) -> Result<(), String> {
    if title.is_empty() {
        return Err("title should not be empty".to_string());
    }
    Ok(())
}

/// POST /todos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

impl Validate for CreateTodo {
    fn validate(&self) -> Result<(), String> {
        require_title(&self.title)
    }
}

/// PUT /todos/{id}. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceTodo {
    pub title: String,
    pub completed: bool,
    pub order: i64,
}

impl Validate for ReplaceTodo {
    fn validate(&self) -> Result<(), String> {
        require_title(&self.title)
    }
}

impl From<ReplaceTodo> for UpdateTodo {
    fn from(value: ReplaceTodo) -> Self {
        UpdateTodo::replace(value.title, value.completed, value.order)
    }
}

/// PATCH /todos/{id} deserializes straight into `UpdateTodo`.
impl Validate for UpdateTodo {
    fn validate(&self) -> Result<(), String> {
        match &self.title {
            Some(title) => require_title(title),
            None => Ok(()),
        }
    }
}

/// Query string of DELETE /todos.
///
/// Never rejects: a query that does not parse, or that repeats `completed`,
/// falls back to deleting everything.
#[derive(Debug, Default)]
pub struct DeleteTodosQuery {
    pub completed: Vec<String>,
}

impl DeleteTodosQuery {
    pub fn from_uri(uri: &Uri) -> Self {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Self {
            completed: pairs
                .into_iter()
                .filter(|(key, _)| key == "completed")
                .map(|(_, value)| value)
                .collect(),
        }
    }

    /// Only a single literal `completed=true` narrows the delete.
    pub fn completed_only(&self) -> bool {
        matches!(self.completed.as_slice(), [value] if value == "true")
    }
}

impl<S> FromRequestParts<S> for DeleteTodosQuery
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_uri(&parts.uri))
    }
}

/// The `{id}` path segment, percent-decoded.
#[derive(Debug, Clone)]
pub struct TodoId(pub String);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(Self(id))
    }
}

/// A todo as returned over HTTP, with a link to itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub order: i64,
    pub url: String,
}

impl TodoResponse {
    pub fn new(todo: Todo, url: String) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            completed: todo.completed,
            order: todo.order,
            url,
        }
    }
}

/// Uniform body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}

/// JSON body extractor that turns malformed or invalid payloads into 400s.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        value.validate().map_err(ApiError::Validation)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_todo_rejects_empty_title() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert_eq!(input.validate().unwrap_err(), "title should not be empty");
    }

    #[test]
    fn replace_todo_requires_every_field() {
        let result: Result<ReplaceTodo, _> =
            serde_json::from_str(r#"{"title":"t","completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn replace_todo_becomes_full_update() {
        let input: ReplaceTodo =
            serde_json::from_str(r#"{"title":"t","completed":true,"order":3}"#).unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(UpdateTodo::from(input), UpdateTodo::replace("t", true, 3));
    }

    #[test]
    fn patch_allows_any_subset() {
        let input: UpdateTodo = serde_json::from_str(r#"{"completed":false}"#).unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.completed, Some(false));
    }

    #[test]
    fn patch_rejects_empty_title() {
        let input: UpdateTodo = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn delete_query_only_matches_literal_true() {
        let q = |uri: &'static str| DeleteTodosQuery::from_uri(&Uri::from_static(uri));
        assert!(q("/todos?completed=true").completed_only());
        assert!(q("/todos?other=1&completed=true").completed_only());
        assert!(!q("/todos?completed=false").completed_only());
        assert!(!q("/todos?completed=TRUE").completed_only());
        assert!(!q("/todos").completed_only());
    }

    #[test]
    fn repeated_completed_key_deletes_everything() {
        let query =
            DeleteTodosQuery::from_uri(&Uri::from_static("/todos?completed=true&completed=false"));
        assert_eq!(query.completed, vec!["true", "false"]);
        assert!(!query.completed_only());

        let query =
            DeleteTodosQuery::from_uri(&Uri::from_static("/todos?completed=true&completed=true"));
        assert!(!query.completed_only());
    }

    #[test]
    fn error_body_uses_camel_case() {
        let body = ErrorBody {
            status_code: 404,
            message: "Todo with id 1 not found".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["message"], "Todo with id 1 not found");
    }

    #[test]
    fn todo_response_carries_url() {
        let todo = Todo {
            id: "1".to_string(),
            title: "test".to_string(),
            completed: false,
            order: 1,
        };
        let json = serde_json::to_value(TodoResponse::new(
            todo,
            "http://localhost/todos/1".to_string(),
        ))
        .unwrap();
        assert_eq!(json["url"], "http://localhost/todos/1");
        assert_eq!(json["order"], 1);
    }
}
