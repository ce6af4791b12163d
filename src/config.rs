//! Client configuration.
//!
//! The endpoint and credential are process-wide settings loaded once and
//! injected into [`RemoteFileClient`](crate::api::RemoteFileClient) at
//! construction.

use std::env;
use std::time::Duration;

use crate::error::{FmError, Result};

/// Default chunk size for chunked uploads (4 MiB).
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * 1024 * 1024;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection and transfer settings for the file-manager service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base endpoint, e.g. `http://localhost:8080/v1/filemanager`
    pub base_url: String,
    /// Bearer credential sent with every request
    pub auth_token: Option<String>,
    /// Optional HTTP/SOCKS proxy URL
    pub proxy: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Chunk size in bytes for chunked uploads
    pub chunk_size: u64,
    /// Files larger than this are uploaded in chunks by `Explorer::upload_file`
    pub chunk_threshold: u64,
}

impl ClientConfig {
    /// Create a configuration for the given base endpoint with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_threshold: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Route requests through a proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the chunk size. The chunked-upload threshold follows it.
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_threshold = chunk_size;
        self
    }

    /// Set the size above which `upload_file` switches to chunked upload.
    pub fn with_chunk_threshold(mut self, threshold: u64) -> Self {
        self.chunk_threshold = threshold;
        self
    }

    /// Load configuration from the environment.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `FM_BASE_URL` | service endpoint | `http://localhost:8080/v1/filemanager` |
    /// | `FM_AUTH_TOKEN` | bearer credential | none |
    /// | `FM_PROXY` | proxy URL | none |
    /// | `FM_TIMEOUT_SECS` | request timeout | 30 |
    /// | `FM_CHUNK_SIZE` | chunk size in bytes | 4194304 |
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("FM_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/v1/filemanager".to_string());
        let mut config = Self::new(base_url);

        config.auth_token = env::var("FM_AUTH_TOKEN").ok().filter(|t| !t.is_empty());
        config.proxy = env::var("FM_PROXY").ok().filter(|p| !p.is_empty());

        if let Ok(secs) = env::var("FM_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| FmError::Config(format!("invalid FM_TIMEOUT_SECS: {}", e)))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(size) = env::var("FM_CHUNK_SIZE") {
            let size: u64 = size
                .parse()
                .map_err(|e| FmError::Config(format!("invalid FM_CHUNK_SIZE: {}", e)))?;
            config = config.with_chunk_size(size);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(FmError::Config("base URL is empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(FmError::Config(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.chunk_size == 0 {
            return Err(FmError::Config("chunk size must be positive".to_string()));
        }
        Ok(())
    }
}
