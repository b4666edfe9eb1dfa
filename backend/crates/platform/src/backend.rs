//! Backend-as-a-Service HTTP Client
//!
//! Thin wrapper over `reqwest` that knows the hosted backend's URL layout
//! (`/auth/v1/*` for identity, `/rest/v1/*` for table access) and attaches
//! the public API key to every request. Domain crates turn
//! [`BackendError`] into their own error taxonomy at the call site.

use std::sync::Arc;

use reqwest::RequestBuilder;
pub use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::BackendConfig;

const AUTH_PREFIX: &str = "auth/v1";
const REST_PREFIX: &str = "rest/v1";

#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, TLS, timeout or client construction failure
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response, body kept verbatim for error classification
    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// 2xx response whose body did not match the expected shape
    #[error("Unexpected backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// HTTP status if the backend answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body for `Status` errors
    pub fn body(&self) -> Option<&str> {
        match self {
            BackendError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Shared client for the hosted backend
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: Arc<BackendConfig>,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Absolute URL of an identity endpoint, e.g. `auth_url("token?grant_type=password")`
    pub fn auth_url(&self, path: &str) -> String {
        self.endpoint(AUTH_PREFIX, path)
    }

    /// Absolute URL of a table endpoint
    pub fn rest_url(&self, table: &str) -> String {
        self.endpoint(REST_PREFIX, table)
    }

    /// Request against the identity API
    pub fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, self.auth_url(path))
    }

    /// Request against the table API
    pub fn rest(&self, method: Method, table: &str) -> RequestBuilder {
        self.request(method, self.rest_url(table))
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
    }

    fn endpoint(&self, prefix: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.url.as_str().trim_end_matches('/'),
            prefix,
            path.trim_start_matches('/')
        )
    }
}

/// Send a request and decode a JSON body
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(BackendError::Status { status, body });
    }

    serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Send a request whose success body is irrelevant
pub async fn send_empty(request: RequestBuilder) -> Result<(), BackendError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Status { status, body });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(BackendConfig::new(&server.uri(), "anon-key").unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_layout() {
        let client =
            BackendClient::new(BackendConfig::new("https://p.supabase.co/", "k").unwrap()).unwrap();
        assert_eq!(
            client.auth_url("/token?grant_type=password"),
            "https://p.supabase.co/auth/v1/token?grant_type=password"
        );
        assert_eq!(client.rest_url("alerts"), "https://p.supabase.co/rest/v1/alerts");
    }

    #[tokio::test]
    async fn test_send_json_attaches_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/alerts"))
            .and(header("apikey", "anon-key"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"id":1}]"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let rows: Vec<serde_json::Value> =
            send_json(client.rest(Method::GET, "alerts").query(&[("limit", "5")]))
                .await
                .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_non_success_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"msg":"invalid JWT"}"#))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = send_json::<serde_json::Value>(client.auth(Method::GET, "user"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(err.body().unwrap().contains("invalid JWT"));
    }

    #[tokio::test]
    async fn test_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/gait_data"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = send_json::<Vec<serde_json::Value>>(client.rest(Method::GET, "gait_data"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // port 9 (discard) is not listening in test environments
        let client =
            BackendClient::new(BackendConfig::new("http://127.0.0.1:9", "k").unwrap()).unwrap();
        let err = send_empty(client.auth(Method::POST, "logout")).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }
}
