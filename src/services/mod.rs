//! Outbound HTTP collaborators: page fetching and price data.

pub mod binance;
pub mod fetch;
pub mod market_data;

pub use binance::BinanceKlinesProvider;
pub use fetch::{HttpPageFetcher, PageFetcher};
pub use market_data::MarketDataProvider;

use std::time::Duration;

use crate::error::{Result, WatchError};

/// Shared client builder: fixed user agent and a hard request timeout
pub fn build_http_client(user_agent: &str, timeout_seconds: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| WatchError::Config(format!("Failed to build HTTP client: {}", e)))
}
