//! Scriptable in-memory transport for testing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! pantau-comment = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use pantau_comment::mock::MockTransport;
//! use pantau_comment::CommentApi;
//!
//! let mock = MockTransport::new();
//! mock.respond("/api/documents/10/comments", serde_json::json!([]));
//!
//! let api = CommentApi::new(mock.clone());
//! let comments = api.fetch_comments(ResourceRef::document(10)).await?;
//! assert_eq!(mock.request_count(), 1);
//! ```

mod gate;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

pub use gate::MockGate;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::transport::{ApiRequest, CommentTransport, Method};

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(u16),
    Network,
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(Option<Method>, String), VecDeque<Reply>>,
    gates: HashMap<String, MockGate>,
    requests: Vec<ApiRequest>,
}

impl MockState {
    fn push(&mut self, method: Option<Method>, path: &str, reply: Reply) {
        self.routes
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(reply);
    }

    /// Pops queued replies in order; the last one keeps answering.
    fn next_reply(&mut self, method: Method, path: &str) -> Option<Reply> {
        let queue = match self.routes.get_mut(&(Some(method), path.to_owned())) {
            Some(queue) => queue,
            None => self.routes.get_mut(&(None, path.to_owned()))?,
        };

        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

/// In-memory [`CommentTransport`] that records every request.
///
/// Routes are keyed by path including the query string. Unscripted `POST`s
/// succeed with an empty body; unscripted `GET`s fail with 404.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a transport with no scripted routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests to `path` (any method) with `body`.
    ///
    /// Calling this several times for one path queues the bodies; the last
    /// one keeps answering once the others are used up.
    pub fn respond(&self, path: &str, body: Value) {
        self.lock().push(None, path, Reply::Json(body));
    }

    /// Answers `method` requests to `path` with `body`.
    pub fn respond_to(&self, method: Method, path: &str, body: Value) {
        self.lock().push(Some(method), path, Reply::Json(body));
    }

    /// Answers requests to `path` with an HTTP error status.
    pub fn fail(&self, path: &str, status: u16) {
        self.lock().push(None, path, Reply::Status(status));
    }

    /// Answers `method` requests to `path` with an HTTP error status.
    pub fn fail_to(&self, method: Method, path: &str, status: u16) {
        self.lock().push(Some(method), path, Reply::Status(status));
    }

    /// Answers requests to `path` with a connection failure.
    pub fn fail_network(&self, path: &str) {
        self.lock().push(None, path, Reply::Network);
    }

    /// Holds the next request to `path` until the returned gate is released.
    pub fn hold(&self, path: &str) -> MockGate {
        let gate = MockGate::new();
        self.lock().gates.insert(path.to_owned(), gate.clone());
        gate
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// Requests received for `path` (including query string).
    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|request| request.path_and_query() == path)
            .cloned()
            .collect()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Forgets recorded requests, keeping scripted routes.
    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl CommentTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let path = request.path_and_query();
        let (reply, gate) = {
            let mut state = self.lock();
            state.requests.push(request.clone());
            let gate = state.gates.remove(&path);
            (state.next_reply(request.method, &path), gate)
        };

        if let Some(gate) = gate {
            gate.wait().await;
        }

        match reply {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(Error::from_status(status)),
            Some(Reply::Network) => {
                Err(Error::network_error().with_message("Connection refused"))
            }
            None if request.method == Method::Post => Ok(Value::Null),
            None => Err(Error::from_status(404)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_queued_replies() {
        let mock = MockTransport::new();
        mock.respond("/api/a", json!(1));
        mock.respond("/api/a", json!(2));

        let request = ApiRequest::get("/api/a");
        assert_eq!(mock.send(&request).await.unwrap(), json!(1));
        assert_eq!(mock.send(&request).await.unwrap(), json!(2));
        assert_eq!(mock.send(&request).await.unwrap(), json!(2));
        assert_eq!(mock.request_count(), 3);
    }

    #[tokio::test]
    async fn test_defaults() {
        let mock = MockTransport::new();
        let posted = mock.send(&ApiRequest::post("/api/x", json!({}))).await;
        assert_eq!(posted.unwrap(), Value::Null);

        let fetched = mock.send(&ApiRequest::get("/api/x")).await;
        assert_eq!(fetched.unwrap_err().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_method_specific_route_wins() {
        let mock = MockTransport::new();
        mock.respond("/api/x", json!("any"));
        mock.respond_to(Method::Post, "/api/x", json!("post"));

        let posted = mock.send(&ApiRequest::post("/api/x", json!({}))).await;
        assert_eq!(posted.unwrap(), json!("post"));
        let fetched = mock.send(&ApiRequest::get("/api/x")).await;
        assert_eq!(fetched.unwrap(), json!("any"));
    }

    #[tokio::test]
    async fn test_hold_and_release() {
        let mock = MockTransport::new();
        mock.respond("/api/slow", json!("done"));
        let gate = mock.hold("/api/slow");

        let request = ApiRequest::get("/api/slow");
        let (result, ()) = tokio::join!(mock.send(&request), async {
            gate.arrived().await;
            assert_eq!(mock.request_count(), 1);
            gate.release();
        });

        assert_eq!(result.unwrap(), json!("done"));
    }
}
