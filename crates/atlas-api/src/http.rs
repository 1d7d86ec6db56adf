//! # HTTP Transport
//!
//! The shared transport every resource accessor talks through.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       HttpClient Pipeline                               │
//! │                                                                         │
//! │  resource method                                                        │
//! │       │  endpoint("api/customers/") + typed query                       │
//! │       ▼                                                                 │
//! │  attach bearer ──► send ──► status check ──► decode                    │
//! │                      │           │                                      │
//! │                      │           ├─ expected ──► Ok(body)              │
//! │                      │           ├─ 401 ───────► Unauthorized          │
//! │                      │           ├─ other 2xx ─► warn + soft failure   │
//! │                      │           └─ 4xx/5xx ───► parse error body      │
//! │                      └─ transport error ───────► Network               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Discipline
//! Each verb has exactly one expected status: GET `200`, POST `201`,
//! PUT `200`, DELETE `204`. A success status other than the expected one
//! means the backend did something the client did not ask for; it is logged
//! and reported as [`ApiError::UnexpectedStatus`] rather than silently
//! treated as success.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::warn;
use url::Url;

use crate::error::{parse_error_body, ApiError, ApiResult};

/// Collection envelope used by every paginated list endpoint.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Paginated<T> {
    pub results: Vec<T>,
}

/// Shared HTTP transport for the store backend.
///
/// Cheap to clone: the underlying connection pool and the bearer slot are
/// shared across clones, so a token set after login is visible to every
/// resource accessor.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    bearer: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Creates a transport rooted at the given base URL.
    ///
    /// The base URL is normalized to end with a slash so endpoint joins
    /// append instead of replacing the last path segment.
    ///
    /// ## Example
    /// ```rust
    /// use atlas_api::http::HttpClient;
    ///
    /// let client = HttpClient::new("http://127.0.0.1:8000").unwrap();
    /// ```
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let mut url = Url::parse(base_url)
            .map_err(|e| ApiError::network(format!("invalid base URL '{base_url}': {e}")))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: url,
            bearer: Arc::new(RwLock::new(None)),
        })
    }

    /// Resolves a backend path like `api/customers/` against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::network(format!("invalid endpoint '{path}': {e}")))
    }

    /// Replaces the bearer token attached to subsequent requests.
    pub(crate) async fn set_bearer(&self, token: Option<String>) {
        *self.bearer.write().await = token;
    }

    /// The currently attached bearer token, if any.
    pub(crate) async fn bearer(&self) -> Option<String> {
        self.bearer.read().await.clone()
    }

    /// GET expecting `200` with a `{ results: [...] }` envelope.
    pub(crate) async fn get_results<T: DeserializeOwned>(&self, url: Url) -> ApiResult<Vec<T>> {
        let response = self.send(self.http.get(url)).await?;
        let response = Self::check(response, StatusCode::OK).await?;
        let page: Paginated<T> = response.json().await?;
        Ok(page.results)
    }

    /// GET expecting `200` with a bare JSON array body.
    ///
    /// Only two endpoints answer this way; everything else is enveloped.
    pub(crate) async fn get_array<T: DeserializeOwned>(&self, url: Url) -> ApiResult<Vec<T>> {
        let response = self.send(self.http.get(url)).await?;
        let response = Self::check(response, StatusCode::OK).await?;
        Ok(response.json().await?)
    }

    /// GET expecting `200` with a single object body.
    pub(crate) async fn get_one<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let response = self.send(self.http.get(url)).await?;
        let response = Self::check(response, StatusCode::OK).await?;
        Ok(response.json().await?)
    }

    /// POST expecting `201 Created`.
    pub(crate) async fn post<B, T>(&self, url: Url, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_expect(url, body, StatusCode::CREATED).await
    }

    /// POST with a caller-chosen expected status.
    ///
    /// The token endpoints answer `200` where every resource create
    /// answers `201`.
    pub(crate) async fn post_expect<B, T>(
        &self,
        url: Url,
        body: &B,
        expected: StatusCode,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.http.post(url).json(body)).await?;
        let response = Self::check(response, expected).await?;
        Ok(response.json().await?)
    }

    /// PUT expecting `200`.
    pub(crate) async fn put<B, T>(&self, url: Url, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.http.put(url).json(body)).await?;
        let response = Self::check(response, StatusCode::OK).await?;
        Ok(response.json().await?)
    }

    /// DELETE expecting `204 No Content`.
    pub(crate) async fn delete(&self, url: Url) -> ApiResult<()> {
        let response = self.send(self.http.delete(url)).await?;
        Self::check(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    /// Attaches the bearer token and performs the request.
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let request = match self.bearer.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Applies the status discipline described in the module docs.
    async fn check(response: Response, expected: StatusCode) -> ApiResult<Response> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status.is_success() {
            warn!(
                path = response.url().path(),
                status = status.as_u16(),
                expected = expected.as_u16(),
                "unexpected success status from backend"
            );
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                expected: expected.as_u16(),
            });
        }
        let body = response.text().await.unwrap_or_default();
        Err(parse_error_body(status.as_u16(), &body))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let client = HttpClient::new("http://127.0.0.1:8000").unwrap();
        let url = client.endpoint("api/customers/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/customers/");
    }

    #[test]
    fn test_base_url_with_prefix_keeps_prefix() {
        let client = HttpClient::new("http://store.local/backend").unwrap();
        let url = client.endpoint("api/orders/").unwrap();
        assert_eq!(url.as_str(), "http://store.local/backend/api/orders/");
    }

    #[test]
    fn test_endpoint_without_trailing_slash_is_preserved() {
        // The category delete route is the one path the backend exposes
        // without a trailing slash.
        let client = HttpClient::new("http://127.0.0.1:8000/").unwrap();
        let url = client.endpoint("api/category/delete/7").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/category/delete/7");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = HttpClient::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_paginated_envelope_decodes() {
        let page: Paginated<i64> = serde_json::from_str(r#"{"results": [1, 2, 3]}"#).unwrap();
        assert_eq!(page.results, vec![1, 2, 3]);
    }

    #[test]
    fn test_paginated_envelope_with_count_fields_decodes() {
        // LimitOffsetPagination also sends count/next/previous; only
        // results matters to the client.
        let body = r#"{"count": 2, "next": null, "previous": null, "results": [{"id": 1}, {"id": 2}]}"#;
        let page: Paginated<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert_eq!(page.results.len(), 2);
    }

    #[tokio::test]
    async fn test_bearer_is_shared_across_clones() {
        let client = HttpClient::new("http://127.0.0.1:8000").unwrap();
        let clone = client.clone();
        client.set_bearer(Some("token-abc".into())).await;
        assert_eq!(clone.bearer().await.as_deref(), Some("token-abc"));
        client.set_bearer(None).await;
        assert_eq!(clone.bearer().await, None);
    }
}
