//! Signal engine: RSI zone and moving-average cross on the latest close.
//!
//! Every qualifying run alerts again; there is no memory between runs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::config::SignalConfig;
use crate::error::{Result, WatchError};
use crate::indicators::{calculate_rsi, calculate_sma};
use crate::models::{CrossState, RsiZone, SignalAlert, SignalReading};
use crate::notify::{format, Notifier};
use crate::services::MarketDataProvider;

#[derive(Debug, Default, Clone)]
pub struct SignalReport {
    pub reading: Option<SignalReading>,
    pub alerts: Vec<SignalAlert>,
    pub delivered: usize,
    pub errors: usize,
}

pub struct SignalEngine {
    config: SignalConfig,
    provider: Arc<dyn MarketDataProvider>,
}

impl SignalEngine {
    pub fn new(config: &SignalConfig, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            config: config.clone(),
            provider,
        }
    }

    pub fn min_closes(&self) -> usize {
        self.config.min_closes()
    }

    /// Classify the latest close of `closes` (oldest first), stamped with `now`
    pub fn evaluate(&self, closes: &[f64], now: DateTime<Utc>) -> Result<SignalReading> {
        let required = self.min_closes();
        let insufficient = || WatchError::InsufficientData {
            required,
            actual: closes.len(),
        };
        if closes.len() < required {
            return Err(insufficient());
        }

        let cfg = &self.config;
        let price = *closes.last().ok_or_else(insufficient)?;
        let rsi = calculate_rsi(closes, cfg.rsi_period).ok_or_else(insufficient)?;
        let ma_fast = calculate_sma(closes, cfg.ma_fast_period).ok_or_else(insufficient)?;
        let ma_slow = calculate_sma(closes, cfg.ma_slow_period).ok_or_else(insufficient)?;

        Ok(SignalReading {
            symbol: cfg.symbol.clone(),
            price,
            rsi,
            rsi_period: cfg.rsi_period,
            ma_fast,
            ma_slow,
            ma_fast_period: cfg.ma_fast_period,
            ma_slow_period: cfg.ma_slow_period,
            zone: RsiZone::classify(rsi, cfg.rsi_oversold, cfg.rsi_overbought),
            cross: CrossState::classify(ma_fast, ma_slow),
            timestamp: now,
        })
    }

    /// Fetch, evaluate and dispatch. Failures end this subsystem's run only.
    pub async fn run(&self, notifier: Option<&dyn Notifier>, now: DateTime<Utc>) -> SignalReport {
        let mut report = SignalReport::default();
        let cfg = &self.config;

        let closes = match self
            .provider
            .get_closes(&cfg.symbol, &cfg.interval, cfg.limit)
            .await
        {
            Ok(closes) => closes,
            Err(e) => {
                warn!(symbol = %cfg.symbol, error = %e, "Price fetch failed, skipping signal evaluation");
                report.errors += 1;
                return report;
            }
        };

        let reading = match self.evaluate(&closes, now) {
            Ok(reading) => reading,
            Err(e) => {
                warn!(symbol = %cfg.symbol, kind = e.kind(), error = %e, "Signal evaluation aborted");
                report.errors += 1;
                return report;
            }
        };

        info!(
            symbol = %reading.symbol,
            price = reading.price,
            rsi = reading.rsi,
            ma_fast = reading.ma_fast,
            ma_slow = reading.ma_slow,
            zone = ?reading.zone,
            cross = ?reading.cross,
            "Signal evaluated"
        );

        report.alerts = reading.alerts();
        report.reading = Some(reading);

        let Some(notifier) = notifier else {
            if !report.alerts.is_empty() {
                info!(count = report.alerts.len(), "Dispatch disabled, signal alerts not sent");
            }
            return report;
        };

        for alert in &report.alerts {
            match notifier.send(&format::signal_alert(alert)).await {
                Ok(()) => {
                    report.delivered += 1;
                    info!(symbol = %alert.symbol, kind = ?alert.kind, "Signal alert sent");
                }
                Err(e) => {
                    report.errors += 1;
                    error!(symbol = %alert.symbol, kind = ?alert.kind, error = %e, "Signal alert delivery failed");
                }
            }
        }

        report
    }
}
