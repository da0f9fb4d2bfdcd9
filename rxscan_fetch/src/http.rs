use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use rxscan_core::{ContentSource, RetrievalError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::retry_with_backoff;

/// HTTP retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    /// Request timeout (seconds)
    #[serde(default = "HttpSourceConfig::default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header
    #[serde(default = "HttpSourceConfig::default_user_agent")]
    pub user_agent: String,

    /// Maximum response size (bytes)
    #[serde(default = "HttpSourceConfig::default_max_size")]
    pub max_size: usize,

    /// Treat non-2xx responses as failures instead of scanning the error body
    #[serde(default)]
    pub require_success_status: bool,

    /// Backoff schedule for transient failures; empty means one attempt
    #[serde(default)]
    pub retry_delays_ms: Vec<u64>,
}

impl HttpSourceConfig {
    const fn default_timeout() -> u64 {
        10
    }

    fn default_user_agent() -> String {
        "Mozilla/5.0 (compatible; rxscan/1.0)".to_string()
    }

    const fn default_max_size() -> usize {
        5_000_000 // 5MB
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn retry_delays(&self) -> Vec<Duration> {
        self.retry_delays_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect()
    }
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
            user_agent: Self::default_user_agent(),
            max_size: Self::default_max_size(),
            require_success_status: false,
            retry_delays_ms: Vec::new(),
        }
    }
}

/// Fetches resource text over http(s).
pub struct HttpSource {
    client: Client,
    config: HttpSourceConfig,
    retry_delays: Vec<Duration>,
}

impl HttpSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;
        let retry_delays = config.retry_delays();

        Ok(Self {
            client,
            config,
            retry_delays,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> RetrievalError {
        if e.is_timeout() {
            RetrievalError::Timeout(self.config.timeout())
        } else {
            RetrievalError::Transport(e.to_string())
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, RetrievalError> {
        let parsed = url::Url::parse(url).map_err(|e| RetrievalError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RetrievalError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                parsed.scheme()
            )));
        }

        let response = self
            .client
            .get(parsed.as_str())
            .header(ACCEPT, "text/html, application/javascript, text/*;q=0.9, */*;q=0.5")
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if self.config.require_success_status && !status.is_success() {
            return Err(RetrievalError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        if is_binary_content_type(&content_type) {
            return Err(RetrievalError::NotText(content_type));
        }

        if let Some(length) = response.content_length() {
            let length = usize::try_from(length).unwrap_or(usize::MAX);
            if length > self.config.max_size {
                return Err(RetrievalError::TooLarge {
                    size: length,
                    max: self.config.max_size,
                });
            }
        }

        let bytes = response.bytes().await.map_err(|e| self.map_reqwest_error(e))?;
        if bytes.len() > self.config.max_size {
            return Err(RetrievalError::TooLarge {
                size: bytes.len(),
                max: self.config.max_size,
            });
        }

        debug!(url, status = status.as_u16(), bytes = bytes.len(), "Received response");

        String::from_utf8(bytes.to_vec()).map_err(|_| {
            RetrievalError::NotText(if content_type.is_empty() {
                "invalid UTF-8".to_string()
            } else {
                format!("invalid UTF-8 in {content_type}")
            })
        })
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, RetrievalError> {
        retry_with_backoff(
            || self.fetch_once(url),
            &self.retry_delays,
            RetrievalError::is_transient,
        )
        .await
    }
}

/// Media types that can never hold scannable text.
fn is_binary_content_type(content_type: &str) -> bool {
    ["image/", "audio/", "video/", "font/"]
        .iter()
        .any(|prefix| content_type.starts_with(prefix))
        || content_type.starts_with("application/octet-stream")
        || content_type.starts_with("application/zip")
        || content_type.starts_with("application/pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_source_config_default() {
        let config = HttpSourceConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_size, 5_000_000);
        assert!(config.user_agent.contains("rxscan"));
        assert!(!config.require_success_status);
        assert!(config.retry_delays().is_empty());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: HttpSourceConfig =
            serde_json::from_str(r#"{"retry_delays_ms": [100, 250]}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(
            config.retry_delays(),
            vec![Duration::from_millis(100), Duration::from_millis(250)]
        );
    }

    #[test]
    fn test_binary_content_types() {
        assert!(is_binary_content_type("image/png"));
        assert!(is_binary_content_type("application/octet-stream"));
        assert!(!is_binary_content_type("text/html; charset=utf-8"));
        assert!(!is_binary_content_type("application/javascript"));
        assert!(!is_binary_content_type(""));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let source = HttpSource::new(HttpSourceConfig::default()).unwrap();
        let err = source.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_rejected() {
        let source = HttpSource::new(HttpSourceConfig::default()).unwrap();
        let err = source.fetch("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidUrl(msg) if msg.contains("file")));
    }
}
