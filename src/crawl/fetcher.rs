//! Page fetching
//!
//! The crawler only needs one thing from the network: the full response body
//! of a URL as text. That contract lives behind the [`Fetch`] trait so the
//! crawl loop can run against an in-memory site in tests; [`HttpFetcher`] is
//! the real implementation.

use crate::urls::NormalUrl;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Source of raw page text
pub trait Fetch {
    /// Read the full document at `url` as text.
    fn fetch(
        &self,
        url: &NormalUrl,
    ) -> impl std::future::Future<Output = Result<String, FetchError>> + Send;
}

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("websift/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP implementation of [`Fetch`] backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &NormalUrl) -> Result<String, FetchError> {
        let response = self.client.get(url.to_string()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(normalize_newlines(&body))
    }
}

/// Normalise line terminators to `\n`.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
