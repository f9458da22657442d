//! Document retrieval for the change detector.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::HttpConfig;
use crate::error::{Result, WatchError};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Return the raw body of `url`. Network errors, timeouts and non-2xx
    /// statuses are all `WatchError::Fetch`.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = super::build_http_client(&config.user_agent, config.fetch_timeout_seconds)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| WatchError::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::Fetch(format!("{} returned {}", url, status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WatchError::Fetch(format!("{}: failed to read body: {}", url, e)))?;

        debug!(url = %url, bytes = body.len(), "Fetched document");
        Ok(body)
    }
}
