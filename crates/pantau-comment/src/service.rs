//! Comment API wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::comment::UniversalComment;
use crate::error::{Error, Result};
use crate::normalize::{normalize_list, parse_count};
use crate::payload::{CommentBody, ReactionBody, ReactionKind};
use crate::resource::ResourceRef;
use crate::transport::{ApiRequest, CommentTransport};
use crate::{TRACING_TARGET, endpoint};

/// Typed comment operations over any [`CommentTransport`].
///
/// Adds structured logging around every request. The transport is wrapped
/// in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct CommentApi {
    inner: Arc<dyn CommentTransport>,
}

impl fmt::Debug for CommentApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentApi").finish_non_exhaustive()
    }
}

impl CommentApi {
    /// Creates a new API wrapper around a transport.
    pub fn new<T>(transport: T) -> Self
    where
        T: CommentTransport + 'static,
    {
        Self {
            inner: Arc::new(transport),
        }
    }

    /// Fetches and normalizes the comment thread of a resource.
    pub async fn fetch_comments(&self, resource: ResourceRef) -> Result<Vec<UniversalComment>> {
        let payload = self.send(&endpoint::list(resource)).await?;
        Ok(normalize_list(&payload))
    }

    /// Fetches the comment count of a resource.
    ///
    /// Returns `None` for resources without a count endpoint.
    pub async fn fetch_count(&self, resource: ResourceRef) -> Result<Option<u64>> {
        let Some(request) = endpoint::count(resource) else {
            return Ok(None);
        };

        let payload = self.send(&request).await?;
        parse_count(&payload).map(Some).ok_or_else(|| {
            Error::serialization().with_message("Count response carries no number")
        })
    }

    /// Posts a root comment.
    pub async fn create_comment(&self, resource: ResourceRef, body: &CommentBody) -> Result<Value> {
        self.send(&endpoint::create(resource, body)?).await
    }

    /// Posts a reply to `parent_id`.
    pub async fn reply(
        &self,
        resource: ResourceRef,
        parent_id: i64,
        body: &CommentBody,
    ) -> Result<Value> {
        self.send(&endpoint::reply(resource, parent_id, body)?)
            .await
    }

    /// Posts a like or dislike on `comment_id`.
    pub async fn react(
        &self,
        resource: ResourceRef,
        comment_id: i64,
        kind: ReactionKind,
        body: &ReactionBody,
    ) -> Result<Value> {
        self.send(&endpoint::react(resource, comment_id, kind, body)?)
            .await
    }

    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path_and_query(),
            "Sending comment request"
        );

        let result = self.inner.send(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(_) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    elapsed_ms = elapsed.as_millis(),
                    "Comment request completed"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    method = %request.method,
                    path = %request.path_and_query(),
                    status = ?error.status,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Comment request failed"
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::mock::MockTransport;

    #[tokio::test]
    async fn test_fetch_comments_unwraps_envelope() {
        let mock = MockTransport::new();
        mock.respond(
            "/api/usulan/42/komentar?page=0&size=50",
            json!({ "content": [{ "id": 1, "namaPengguna": "Siti" }] }),
        );
        let api = CommentApi::new(mock.clone());

        let comments = api.fetch_comments(ResourceRef::usulan(42)).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].nama, "Siti");
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_count() {
        let mock = MockTransport::new();
        mock.respond("/api/comments/berita/3/count", json!(12));
        let api = CommentApi::new(mock.clone());

        assert_eq!(api.fetch_count(ResourceRef::berita(3)).await.unwrap(), Some(12));
        assert_eq!(api.fetch_count(ResourceRef::document(3)).await.unwrap(), None);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_count_rejects_garbage() {
        let mock = MockTransport::new();
        mock.respond("/api/comments/berita/3/count", json!({ "ok": true }));
        let api = CommentApi::new(mock);

        let error = api.fetch_count(ResourceRef::berita(3)).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Serialization);
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let mock = MockTransport::new();
        mock.fail("/api/documents/1/comments", 503);
        let api = CommentApi::new(mock);

        let error = api
            .fetch_comments(ResourceRef::document(1))
            .await
            .unwrap_err();
        assert_eq!(error.status, Some(503));
    }
}
