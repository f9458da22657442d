//! Market data provider interface for the signal engine.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Chronological closing prices for `symbol`, oldest first
    async fn get_closes(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<f64>>;
}
