//! Absolute URLs for the `url` field of todo responses.
//!
//! The link is rebuilt from what the client sent: the `Host` header, the
//! scheme (from `X-Forwarded-Proto` when a proxy set it) and the path as
//! originally requested, so routers nested under a prefix still produce
//! correct links.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::header::HOST;
use axum::http::request::Parts;

use crate::AppState;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// `scheme://host/path` of the current request, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    base: String,
}

impl RequestUrl {
    pub fn new(scheme: &str, host: &str, path: &str) -> Self {
        Self {
            base: format!("{scheme}://{host}{}", path.trim_end_matches('/')),
        }
    }

    /// URL of the requested resource itself.
    pub fn current(&self) -> String {
        self.base.clone()
    }

    /// URL of a member of the requested collection.
    pub fn child(&self, id: &str) -> String {
        format!("{}/{id}", self.base)
    }
}

impl FromRequestParts<AppState> for RequestUrl {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let path = match parts.extensions.get::<OriginalUri>() {
            Some(OriginalUri(uri)) => uri.path().to_string(),
            None => parts.uri.path().to_string(),
        };
        let host = parts
            .headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());
        let scheme = parts
            .headers
            .get(FORWARDED_PROTO)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(&*state.public_scheme);

        Ok(RequestUrl::new(scheme, &host, &path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_of_collection() {
        let url = RequestUrl::new("http", "localhost:3000", "/todos");
        assert_eq!(url.child("abc"), "http://localhost:3000/todos/abc");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let url = RequestUrl::new("https", "example.com", "/todos/");
        assert_eq!(url.child("abc"), "https://example.com/todos/abc");
        assert_eq!(url.current(), "https://example.com/todos");
    }

    #[test]
    fn current_keeps_item_path() {
        let url = RequestUrl::new("http", "localhost", "/api/todos/abc");
        assert_eq!(url.current(), "http://localhost/api/todos/abc");
    }
}
