//! `ApiClient` construction and transport primitives.
//!
//! ### Transport
//! - GET, POST with a JSON body, and POST with a multipart upload.
//! - Per-call headers are merged over the default headers; per-call keys win.
//! - Non-2xx responses fail with `Error::Http` carrying the raw body.
//! - Successful responses are normalized by content type (see [`ApiResponse`]).
//!
//! No retries and no caching: every failure is returned to the caller as is.

use std::time::Instant;

use contextforce_core::{ClientConfig, Error, env::CONTEXTFORCE_API_KEY, resolve};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use crate::headers::{RequestHeaders, merge};
use crate::response::ApiResponse;

/// Client for the ContextForce API.
///
/// Holds only immutable configuration, so a single instance can be shared
/// across tasks (it is `Clone`, and clones share the connection pool).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    default_headers: HeaderMap,
}

impl ApiClient {
    /// Create a client with the given API key, falling back to `CONTEXTFORCE_API_KEY`.
    ///
    /// Without a key the client still works but sends no `Authorization` header.
    pub fn new(api_key: Option<&str>) -> Result<Self, Error> {
        Self::with_config(ClientConfig::with_api_key(resolve(api_key, CONTEXTFORCE_API_KEY)))
    }

    /// Create a client from layered configuration (environment, optional TOML file, defaults).
    pub fn from_env() -> Result<Self, Error> {
        Self::with_config(ClientConfig::load()?)
    }

    /// Create a client from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let default_headers = build_default_headers(config.api_key.as_deref())?;

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config, default_headers })
    }

    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref()
    }

    /// Headers sent with every request: `Authorization` when a key is configured.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `base_url` with `target` appended verbatim.
    pub(crate) fn base_target(&self, target: &str) -> String {
        format!("{}{}", self.config.base_url, target)
    }

    /// `search_base_url` with `target` appended verbatim.
    pub(crate) fn search_target(&self, target: &str) -> String {
        format!("{}{}", self.config.search_base_url, target)
    }

    pub(crate) async fn get(&self, url: &str, headers: RequestHeaders) -> Result<ApiResponse, Error> {
        self.send(self.http.get(url), headers).await
    }

    pub(crate) async fn post_json<T>(&self, url: &str, body: &T, headers: RequestHeaders) -> Result<ApiResponse, Error>
    where
        T: Serialize + ?Sized,
    {
        self.send(self.http.post(url).json(body), headers).await
    }

    pub(crate) async fn post_multipart(
        &self, url: &str, form: Form, headers: RequestHeaders,
    ) -> Result<ApiResponse, Error> {
        self.send(self.http.post(url).multipart(form), headers).await
    }

    async fn send(&self, request: RequestBuilder, headers: RequestHeaders) -> Result<ApiResponse, Error> {
        let request = request
            .headers(merge(&self.default_headers, headers.into_inner()))
            .build()
            .map_err(map_reqwest_error)?;

        let method = request.method().clone();
        let url = request.url().clone();
        let start = Instant::now();

        let response = self.http.execute(request).await.map_err(map_reqwest_error)?;

        let status = response.status();
        tracing::debug!(
            %method,
            %url,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "ContextForce response received"
        );

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(Error::Http { status: status.as_u16(), body });
        }

        ApiResponse::from_body(content_type.as_deref(), body)
    }
}

fn build_default_headers(api_key: Option<&str>) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    if let Some(key) = api_key {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| Error::Validation("API key contains characters not allowed in a header".into()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

fn map_reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else if err.is_builder() {
        Error::Validation(format!("invalid request: {err}"))
    } else {
        Error::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::CF_INCLUDE_LINKS;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn test_client(server: &MockServer, api_key: Option<&str>) -> ApiClient {
        let base = format!("{}/", server.uri());
        ApiClient::with_config(ClientConfig {
            api_key: api_key.map(str::to_string),
            base_url: base.clone(),
            search_base_url: base,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_explicit_key_sets_authorization() {
        let client = ApiClient::new(Some("cf-123")).unwrap();
        assert_eq!(client.api_key(), Some("cf-123"));
        assert_eq!(client.default_headers().get(AUTHORIZATION).unwrap(), "Bearer cf-123");
    }

    #[test]
    fn test_new_falls_back_to_env_key() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CONTEXTFORCE_API_KEY", "cf-from-env");
            let client = ApiClient::new(None).map_err(|e| e.to_string())?;
            assert_eq!(client.api_key(), Some("cf-from-env"));
            assert_eq!(client.default_headers().get(AUTHORIZATION).unwrap(), "Bearer cf-from-env");

            let client = ApiClient::new(Some("cf-explicit")).map_err(|e| e.to_string())?;
            assert_eq!(client.api_key(), Some("cf-explicit"));

            jail.set_env("CONTEXTFORCE_API_KEY", "");
            let client = ApiClient::new(None).map_err(|e| e.to_string())?;
            assert!(client.api_key().is_none());
            assert!(client.default_headers().is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_no_key_means_no_default_headers() {
        let client = ApiClient::with_config(ClientConfig::default()).unwrap();
        assert!(client.api_key().is_none());
        assert!(client.default_headers().is_empty());
    }

    #[test]
    fn test_authorization_is_sensitive() {
        let client = ApiClient::new(Some("cf-secret")).unwrap();
        assert!(client.default_headers().get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_key_with_newline_is_rejected() {
        let result = ApiClient::with_config(ClientConfig::with_api_key(Some("bad\nkey".into())));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_targets_are_concatenated_verbatim() {
        let client = ApiClient::with_config(ClientConfig::default()).unwrap();
        assert_eq!(
            client.base_target("https://example.com/a?b=c"),
            "https://r.contextforce.com/https://example.com/a?b=c"
        );
        assert_eq!(
            client.search_target("https://www.google.com/search?q=x"),
            "https://s.contextforce.com/https://www.google.com/search?q=x"
        );
    }

    #[tokio::test]
    async fn test_get_merges_default_and_call_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("authorization", "Bearer cf-key"))
            .and(header("cf-include-links", "true"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("content-type", "text/markdown").set_body_string("# hi"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, Some("cf-key"));
        let headers = RequestHeaders::new().flag(CF_INCLUDE_LINKS, true);
        let response = client.get(&client.base_target("page"), headers).await.unwrap();

        assert_eq!(response, ApiResponse::Text("# hi".into()));
    }

    #[tokio::test]
    async fn test_call_header_overrides_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer per-call"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, Some("cf-key"));
        let headers = RequestHeaders::new().text(AUTHORIZATION, "Bearer per-call").unwrap();
        client.get(&client.base_target(""), headers).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_json_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!(["https://a.example", "https://b.example"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, None);
        let urls = vec!["https://a.example".to_string(), "https://b.example".to_string()];
        let response = client.post_json(&client.base_target(""), &urls, RequestHeaders::new()).await.unwrap();

        assert_eq!(response, ApiResponse::Json(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_no_authorization_without_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(|req: &Request| {
                assert!(!req.headers.contains_key("authorization"));
                ResponseTemplate::new(200)
            })
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, None);
        client.get(&client.base_target(""), RequestHeaders::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_is_http_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500).insert_header("content-type", "text/html").set_body_string("<h1>boom</h1>"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, None);
        let err = client.get(&client.base_target("x"), RequestHeaders::new()).await.unwrap_err();

        match err {
            Error::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "<h1>boom</h1>");
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_body_is_not_parsed_even_if_json_declared() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).insert_header("content-type", "application/json").set_body_string("not json"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, None);
        let err = client.get(&client.base_target("x"), RequestHeaders::new()).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)))
            .mount(&server)
            .await;

        let base = format!("{}/", server.uri());
        let client = ApiClient::with_config(ClientConfig {
            base_url: base.clone(),
            search_base_url: base,
            timeout_ms: Some(100),
            ..Default::default()
        })
        .unwrap();

        let err = client.get(&client.base_target("slow"), RequestHeaders::new()).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "got {err:?}");
    }
}
