//! HTTP client wrapper for file-manager requests.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::error::{FmError, Result};

/// HTTP client bound to one file-manager endpoint.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client for `base_url`, optionally routed through a proxy.
    pub fn new(
        base_url: &str,
        auth_token: Option<String>,
        timeout: Duration,
        proxy: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Client::builder().timeout(timeout);
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| FmError::Config(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| FmError::Config(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    /// Full URL for an endpoint such as `"/tree"`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub fn get(&self, endpoint: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(endpoint)))
    }

    pub fn post(&self, endpoint: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(endpoint)))
    }

    pub fn delete(&self, endpoint: &str) -> RequestBuilder {
        self.authorize(self.client.delete(self.url(endpoint)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and turn any failure into a transport error.
    ///
    /// `fallback` is the message used when the server gives no structured
    /// error body (or no response at all).
    pub async fn send(&self, request: RequestBuilder, fallback: &str) -> Result<Response> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("request failed before response: {}", e);
                return Err(FmError::Transport {
                    message: fallback.to_string(),
                    status: e.status().map(|s| s.as_u16()),
                });
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "request rejected: {}", body);
        Err(FmError::Transport {
            message: error_message(&body).unwrap_or_else(|| fallback.to_string()),
            status: Some(status.as_u16()),
        })
    }
}

/// Extract the human-readable message from a structured error body.
///
/// Accepts `{"error": {"message": "..."}}` and `{"message": "..."}`.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| value.get("message"))?
        .as_str()?
        .trim();

    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new(
            "http://localhost:8080/v1/filemanager/",
            None,
            Duration::from_secs(5),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_url_building() {
        let http = client();
        assert_eq!(
            http.url("/tree"),
            "http://localhost:8080/v1/filemanager/tree"
        );
        assert_eq!(
            http.url("upload-chunk"),
            "http://localhost:8080/v1/filemanager/upload-chunk"
        );
    }

    #[test]
    fn test_bearer_header_applied() {
        let http = HttpClient::new(
            "http://localhost:8080",
            Some("t0ken".to_string()),
            Duration::from_secs(5),
            None,
        )
        .unwrap();
        let request = http.get("/tree").build().unwrap();
        let auth = request.headers().get("authorization").unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer t0ken");
    }

    #[test]
    fn test_no_token_no_header() {
        let request = client().get("/tree").build().unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_proxy_creation() {
        let http = HttpClient::new(
            "http://localhost",
            None,
            Duration::from_secs(5),
            Some("http://127.0.0.1:8080"),
        );
        assert!(http.is_ok());
    }

    #[test]
    fn test_proxy_invalid() {
        let res = HttpClient::new(
            "http://localhost",
            None,
            Duration::from_secs(5),
            Some(":::::::"),
        );
        assert!(matches!(res, Err(FmError::Config(_))));
    }

    #[test]
    fn test_error_message_nested() {
        let body = r#"{"error": {"message": "Directory already exists", "code": 409}}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("Directory already exists")
        );
    }

    #[test]
    fn test_error_message_top_level() {
        let body = r#"{"message": "Path not found"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Path not found"));
    }

    #[test]
    fn test_error_message_absent() {
        assert!(error_message("").is_none());
        assert!(error_message("Internal Server Error").is_none());
        assert!(error_message(r#"{"error": "flat string"}"#).is_none());
        assert!(error_message(r#"{"error": {"message": "  "}}"#).is_none());
    }
}
