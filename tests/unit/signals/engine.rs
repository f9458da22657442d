//! Unit tests for signal engine

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use signalwatch::config::SignalConfig;
use signalwatch::models::{CrossState, RsiZone, SignalAlertKind, SignalReading};
use signalwatch::services::MarketDataProvider;
use signalwatch::signals::SignalEngine;
use signalwatch::WatchError;

struct StaticCloses(Vec<f64>);

#[async_trait]
impl MarketDataProvider for StaticCloses {
    async fn get_closes(&self, _symbol: &str, _interval: &str, _limit: usize) -> signalwatch::Result<Vec<f64>> {
        Ok(self.0.clone())
    }
}

fn create_engine() -> SignalEngine {
    SignalEngine::new(&SignalConfig::default(), Arc::new(StaticCloses(Vec::new())))
}

fn create_uptrend_closes(count: usize) -> Vec<f64> {
    let mut closes = vec![100.0, 99.0];
    closes.extend((0..count).map(|i| 100.0 + i as f64 * 0.5));
    closes
}

fn create_reading(zone: RsiZone, cross: CrossState) -> SignalReading {
    SignalReading {
        symbol: "XRPUSDT".to_string(),
        price: 0.52,
        rsi: 50.0,
        rsi_period: 14,
        ma_fast: 0.5,
        ma_slow: 0.5,
        ma_fast_period: 9,
        ma_slow_period: 21,
        zone,
        cross,
        timestamp: Utc::now(),
    }
}

#[test]
fn test_min_closes_covers_rsi_and_slow_ma() {
    let engine = create_engine();
    assert_eq!(engine.min_closes(), 21);

    let config = SignalConfig {
        rsi_period: 30,
        ..SignalConfig::default()
    };
    assert_eq!(config.min_closes(), 31);
}

#[test]
fn test_evaluate_insufficient_data() {
    let engine = create_engine();
    let closes = vec![1.0; 20];
    match engine.evaluate(&closes, Utc::now()) {
        Err(WatchError::InsufficientData { required, actual }) => {
            assert_eq!(required, 21);
            assert_eq!(actual, 20);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_evaluate_uptrend_is_overbought_and_bullish() {
    let engine = create_engine();
    let closes = create_uptrend_closes(200);
    let reading = engine.evaluate(&closes, Utc::now()).unwrap();

    assert_eq!(reading.symbol, "XRPUSDT");
    assert_eq!(reading.price, *closes.last().unwrap());
    assert_eq!(reading.zone, RsiZone::Overbought);
    assert_eq!(reading.cross, CrossState::BullishCross);
    assert!(reading.ma_fast > reading.ma_slow);

    let kinds: Vec<_> = reading.alerts().iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![SignalAlertKind::Overbought, SignalAlertKind::BullishCross]);
}

#[test]
fn test_evaluate_downtrend_is_oversold_and_bearish() {
    let engine = create_engine();
    let closes: Vec<f64> = (0..60).map(|i| 2.0 - i as f64 * 0.01).collect();
    let reading = engine.evaluate(&closes, Utc::now()).unwrap();

    assert_eq!(reading.zone, RsiZone::Oversold);
    assert_eq!(reading.cross, CrossState::BearishCross);

    let alerts = reading.alerts();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].kind, SignalAlertKind::Oversold);
    assert_eq!(alerts[0].value, reading.rsi);
    assert_eq!(alerts[1].kind, SignalAlertKind::BearishCross);
    assert_eq!(alerts[1].value, reading.ma_fast);
    assert_eq!(alerts[1].reference, Some(reading.ma_slow));
    assert!(alerts.iter().all(|a| a.price == reading.price));
}

#[test]
fn test_neutral_no_cross_emits_nothing() {
    let reading = create_reading(RsiZone::Neutral, CrossState::NoCross);
    assert!(reading.alerts().is_empty());
}

#[test]
fn test_zone_and_cross_alert_independently() {
    let reading = create_reading(RsiZone::Neutral, CrossState::BullishCross);
    let alerts = reading.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, SignalAlertKind::BullishCross);

    let reading = create_reading(RsiZone::Oversold, CrossState::NoCross);
    let alerts = reading.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, SignalAlertKind::Oversold);
}

#[test]
fn test_rsi_zone_thresholds_are_strict() {
    assert_eq!(RsiZone::classify(29.99, 30.0, 70.0), RsiZone::Oversold);
    assert_eq!(RsiZone::classify(30.0, 30.0, 70.0), RsiZone::Neutral);
    assert_eq!(RsiZone::classify(70.0, 30.0, 70.0), RsiZone::Neutral);
    assert_eq!(RsiZone::classify(70.01, 30.0, 70.0), RsiZone::Overbought);
}

#[test]
fn test_cross_state_equal_averages() {
    assert_eq!(CrossState::classify(1.5, 1.5), CrossState::NoCross);
    assert_eq!(CrossState::classify(1.6, 1.5), CrossState::BullishCross);
    assert_eq!(CrossState::classify(1.4, 1.5), CrossState::BearishCross);
}

#[tokio::test]
async fn test_run_without_notifier_reports_alerts() {
    let engine = SignalEngine::new(
        &SignalConfig::default(),
        Arc::new(StaticCloses(create_uptrend_closes(100))),
    );
    let report = engine.run(None, Utc::now()).await;
    assert!(report.reading.is_some());
    assert_eq!(report.alerts.len(), 2);
    assert_eq!(report.delivered, 0);
    assert_eq!(report.errors, 0);
}

#[tokio::test]
async fn test_run_with_short_series_aborts_cleanly() {
    let engine = SignalEngine::new(&SignalConfig::default(), Arc::new(StaticCloses(vec![1.0; 5])));
    let report = engine.run(None, Utc::now()).await;
    assert!(report.reading.is_none());
    assert!(report.alerts.is_empty());
    assert_eq!(report.errors, 1);
}

#[test]
fn test_reading_uses_given_timestamp() {
    let engine = create_engine();
    let now = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
    let reading = engine.evaluate(&create_uptrend_closes(50), now).unwrap();
    assert_eq!(reading.timestamp, now);
    assert!(reading.alerts().iter().all(|a| a.timestamp == now));
}
