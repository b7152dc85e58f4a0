//! Reqwest-based HTTP client for the comment endpoints.

use std::sync::Arc;

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use super::{Error, ReqwestConfig, TRACING_TARGET};
use crate::{ApiRequest, CommentApi, CommentTransport, Method};

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-based [`CommentTransport`] talking to the backend API.
///
/// Request paths are resolved against [`ReqwestConfig::api_base_url`].
/// Successful responses with an empty body decode to JSON `null`; non-2xx
/// responses become errors whose kind follows the status code.
///
/// # Examples
///
/// ```rust,ignore
/// use pantau_comment::reqwest::{ReqwestClient, ReqwestConfig};
///
/// let client = ReqwestClient::new(ReqwestConfig::default())?;
/// let api = client.into_api();
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    pub fn new(config: ReqwestConfig) -> crate::Result<Self> {
        config.validate()?;

        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.api_base_url,
            timeout_ms = timeout.as_millis(),
            authenticated = config.api_token.is_some(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(Error::from)?;

        let inner = ReqwestClientInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into a [`CommentApi`].
    pub fn into_api(self) -> CommentApi {
        CommentApi::new(self)
    }

    async fn execute(&self, request: &ApiRequest) -> crate::Result<Value> {
        let url = self
            .config()
            .endpoint_url(&request.path_and_query())?;

        let mut http_request = match request.method {
            Method::Get => self.inner.http.get(url),
            Method::Post => self.inner.http.post(url),
        };
        http_request = http_request
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Request-Id", request.request_id.to_string());

        if let Some(token) = &self.config().api_token {
            http_request = http_request.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            http_request = http_request.json(body);
        }

        let response = http_request.send().await.map_err(Error::from)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            status_code = status.as_u16(),
            body_len = bytes.len(),
            "Received response"
        );

        if !status.is_success() {
            let mut error = crate::Error::from_status(status.as_u16());
            if let Some(message) = server_message(&bytes) {
                error = error.with_message(message);
            }
            return Err(error);
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&bytes).map_err(Error::from)?)
    }
}

/// Extracts the `message` (or `error`) field from a JSON error body.
fn server_message(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_owned)
}

#[async_trait::async_trait]
impl CommentTransport for ReqwestClient {
    async fn send(&self, request: &ApiRequest) -> crate::Result<Value> {
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::Router;
    use axum::extract::{Path, RawQuery};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use serde_json::json;
    use tokio::net::TcpListener;
    use url::Url;

    use super::*;
    use crate::{CommentBody, ErrorKind, ResourceRef};

    async fn list_usulan(
        Path(id): Path<i64>,
        RawQuery(query): RawQuery,
        headers: HeaderMap,
    ) -> Json<Value> {
        let content_type = headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Json(json!({
            "content": [{
                "id": 1,
                "namaPengguna": "Siti",
                "konten": format!("usulan {id}"),
                "tanggalKomentar": "2024-05-01T10:15:00Z",
                "replies": []
            }],
            "query": query,
            "contentType": content_type
        }))
    }

    async fn create_document_comment(
        Path(id): Path<i64>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let authorized = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            == Some("Bearer token-123");
        if !authorized {
            return StatusCode::UNAUTHORIZED;
        }
        if body["documentId"] != json!(id) {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::CREATED
    }

    async fn spawn_backend() -> Url {
        let app = Router::new()
            .route("/api/usulan/{id}/komentar", get(list_usulan))
            .route("/api/documents/{id}/comments", post(create_document_comment))
            .route(
                "/api/comments/berita/{id}/count",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "message": "sedang pemeliharaan" }))) }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Url::parse(&format!("http://{addr}")).unwrap()
    }

    fn client(base_url: Url) -> ReqwestClient {
        let config = ReqwestConfig::new(base_url)
            .with_timeout(5)
            .with_api_token("token-123");
        ReqwestClient::new(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = ReqwestClient::new(ReqwestConfig::default()).unwrap();
        assert!(client.config().user_agent.is_none());

        let invalid = ReqwestConfig::new(Url::parse("ftp://example.com").unwrap());
        assert_eq!(
            ReqwestClient::new(invalid).unwrap_err().kind,
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_server_message() {
        assert_eq!(
            server_message(br#"{"message":"Komentar tidak ditemukan"}"#).as_deref(),
            Some("Komentar tidak ditemukan")
        );
        assert_eq!(server_message(br#"{"error":" "}"#), None);
        assert_eq!(server_message(b"<html>"), None);
    }

    #[tokio::test]
    async fn test_fetch_paginated_list() {
        let api = client(spawn_backend().await).into_api();

        let comments = api.fetch_comments(ResourceRef::usulan(42)).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].nama, "Siti");
        assert_eq!(comments[0].konten, "usulan 42");
        assert!(comments[0].created_at().is_some());
    }

    #[tokio::test]
    async fn test_query_string_reaches_server() {
        let client = client(spawn_backend().await);
        let request = ApiRequest::get("/api/usulan/42/komentar")
            .with_query("page", "0")
            .with_query("size", "50");

        let payload = client.send(&request).await.unwrap();
        assert_eq!(payload["query"], "page=0&size=50");
        assert_eq!(payload["contentType"], "application/json");
    }

    #[tokio::test]
    async fn test_empty_created_body_is_null() {
        let api = client(spawn_backend().await).into_api();
        let body = CommentBody {
            nama: "Budi".to_owned(),
            konten: "Mantap".to_owned(),
            foto: None,
            biografi_id: None,
            parent_id: None,
        };

        let created = api
            .create_comment(ResourceRef::document(10), &body)
            .await
            .unwrap();
        assert_eq!(created, Value::Null);
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let base_url = spawn_backend().await;
        let api = ReqwestClient::new(ReqwestConfig::new(base_url))
            .unwrap()
            .into_api();
        let body = CommentBody {
            nama: "Budi".to_owned(),
            konten: "Mantap".to_owned(),
            foto: None,
            biografi_id: None,
            parent_id: None,
        };

        let error = api
            .create_comment(ResourceRef::document(10), &body)
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::Authentication);
        assert_eq!(error.status, Some(401));
    }

    #[tokio::test]
    async fn test_error_status_carries_server_message() {
        let api = client(spawn_backend().await).into_api();

        let error = api.fetch_count(ResourceRef::berita(3)).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::ServiceUnavailable);
        assert_eq!(error.message.as_deref(), Some("sedang pemeliharaan"));

        let error = api.fetch_comments(ResourceRef::berita(3)).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(Url::parse(&format!("http://{addr}")).unwrap()).into_api();
        let error = api.fetch_comments(ResourceRef::document(1)).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::NetworkError);
    }
}
