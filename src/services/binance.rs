//! Klines REST provider (Binance-compatible `GET /api/v3/klines`)

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::{HttpConfig, SignalConfig};
use crate::error::{Result, WatchError};
use crate::services::market_data::MarketDataProvider;

/// Column holding the close price in each kline row
const CLOSE_COLUMN: usize = 4;

pub struct BinanceKlinesProvider {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceKlinesProvider {
    pub fn new(signals: &SignalConfig, http: &HttpConfig) -> Result<Self> {
        let client = super::build_http_client(&http.user_agent, http.fetch_timeout_seconds)?;
        Ok(Self::with_client(signals.api_url.clone(), client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.base_url)
    }
}

#[async_trait]
impl MarketDataProvider for BinanceKlinesProvider {
    async fn get_closes(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<f64>> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.klines_url())
            .query(&[("symbol", symbol), ("interval", interval), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| WatchError::Fetch(format!("klines {}: {}", symbol, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::Fetch(format!("klines {} returned {}", symbol, status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| WatchError::Parse(format!("klines {}: {}", symbol, e)))?;

        let closes = parse_closes(&body)?;
        debug!(symbol = %symbol, count = closes.len(), "Fetched closes");
        Ok(closes)
    }
}

/// Extract closes from a klines payload: an array of rows where column 4 is
/// the close, encoded as a decimal string (numbers are accepted too).
pub fn parse_closes(body: &Value) -> Result<Vec<f64>> {
    let rows = body
        .as_array()
        .ok_or_else(|| WatchError::Parse("klines payload is not an array".into()))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let cell = row
                .get(CLOSE_COLUMN)
                .ok_or_else(|| WatchError::Parse(format!("kline row {} has no close column", i)))?;
            let close = match cell {
                Value::String(s) => s.parse::<f64>().ok(),
                Value::Number(n) => n.as_f64(),
                _ => None,
            };
            close
                .filter(|c| c.is_finite())
                .ok_or_else(|| WatchError::Parse(format!("kline row {} has invalid close {}", i, cell)))
        })
        .collect()
}
