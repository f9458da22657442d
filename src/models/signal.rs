//! Discrete signal states derived from RSI and moving averages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Oversold,
    Overbought,
    Neutral,
}

impl RsiZone {
    /// Strict comparisons: a value sitting exactly on a threshold is neutral.
    pub fn classify(rsi: f64, oversold: f64, overbought: f64) -> Self {
        if rsi < oversold {
            RsiZone::Oversold
        } else if rsi > overbought {
            RsiZone::Overbought
        } else {
            RsiZone::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossState {
    BullishCross,
    BearishCross,
    NoCross,
}

impl CrossState {
    pub fn classify(fast: f64, slow: f64) -> Self {
        if fast > slow {
            CrossState::BullishCross
        } else if fast < slow {
            CrossState::BearishCross
        } else {
            CrossState::NoCross
        }
    }
}

/// Result of one signal engine evaluation. Recomputed each run, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalReading {
    pub symbol: String,
    pub price: f64,
    pub rsi: f64,
    pub rsi_period: usize,
    pub ma_fast: f64,
    pub ma_slow: f64,
    pub ma_fast_period: usize,
    pub ma_slow_period: usize,
    pub zone: RsiZone,
    pub cross: CrossState,
    pub timestamp: DateTime<Utc>,
}

impl SignalReading {
    /// Alerts implied by this reading. Zone and cross are independent, so a
    /// single reading yields zero, one or two alerts.
    pub fn alerts(&self) -> Vec<SignalAlert> {
        let mut alerts = Vec::new();

        let zone_kind = match self.zone {
            RsiZone::Oversold => Some(SignalAlertKind::Oversold),
            RsiZone::Overbought => Some(SignalAlertKind::Overbought),
            RsiZone::Neutral => None,
        };
        if let Some(kind) = zone_kind {
            alerts.push(SignalAlert {
                symbol: self.symbol.clone(),
                kind,
                price: self.price,
                value: self.rsi,
                reference: None,
                timestamp: self.timestamp,
            });
        }

        let cross_kind = match self.cross {
            CrossState::BullishCross => Some(SignalAlertKind::BullishCross),
            CrossState::BearishCross => Some(SignalAlertKind::BearishCross),
            CrossState::NoCross => None,
        };
        if let Some(kind) = cross_kind {
            alerts.push(SignalAlert {
                symbol: self.symbol.clone(),
                kind,
                price: self.price,
                value: self.ma_fast,
                reference: Some(self.ma_slow),
                timestamp: self.timestamp,
            });
        }

        alerts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalAlertKind {
    Oversold,
    Overbought,
    BullishCross,
    BearishCross,
}

/// Price alert: `value` is the RSI for zone alerts and the fast MA for cross
/// alerts, in which case `reference` carries the slow MA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalAlert {
    pub symbol: String,
    pub kind: SignalAlertKind,
    pub price: f64,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<f64>,
    pub timestamp: DateTime<Utc>,
}
