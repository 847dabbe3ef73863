//! Mapping from store errors to HTTP responses.
//!
//! Every failure leaves the service as `{"statusCode", "message"}`. Storage
//! failures are logged here and reported to the client without detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use todo_core::TodoError;

use crate::dto::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body failed to parse or validate.
    #[error("{0}")]
    Validation(String),

    /// No route matches the request.
    #[error("Cannot {method} {path}")]
    NoRoute { method: String, path: String },

    #[error(transparent)]
    Todo(#[from] TodoError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NoRoute { .. } => StatusCode::NOT_FOUND,
            ApiError::Todo(TodoError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Todo(TodoError::OrderAlreadyTaken(_)) => StatusCode::CONFLICT,
            ApiError::Todo(TodoError::NoOrderAfter(_)) => StatusCode::CONFLICT,
            ApiError::Todo(TodoError::Repository(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Todo(TodoError::Repository(err)) => {
                tracing::error!(error = %err, "storage failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
