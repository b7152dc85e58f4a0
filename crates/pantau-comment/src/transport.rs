//! The HTTP seam between comment sections and the backend.

use serde_json::Value;
use strum::{AsRefStr, Display};
use uuid::Uuid;

use crate::Result;

/// HTTP method used by the comment endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    /// Read.
    Get,
    /// Create or act.
    Post,
}

/// A request against the comment API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Unique identifier for log correlation.
    pub request_id: Uuid,
    /// HTTP method.
    pub method: Method,
    /// Path starting with `/api/`.
    pub path: String,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// JSON body for `POST` requests.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a `POST` request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Path with the query string appended, e.g. `/api/usulan/42/komentar?page=0&size=50`.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path)
    }
}

/// Sends comment API requests.
///
/// Implementations return the decoded JSON body of a successful (2xx)
/// response, `Value::Null` for an empty body, and an error for anything else.
#[async_trait::async_trait]
pub trait CommentTransport: Send + Sync {
    /// Sends one request and returns the response body.
    async fn send(&self, request: &ApiRequest) -> Result<Value>;
}
