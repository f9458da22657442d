//! End-to-end tests for a single run

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use signalwatch::core::runtime::WatchRuntime;
use signalwatch::notify::Notifier;
use signalwatch::services::HttpPageFetcher;
use signalwatch::snapshot::{MemorySnapshotStore, SnapshotStore};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::{
    klines_body, mount_page, source, test_config, RecordingNotifier, StaticCloses, QUIET_PAGE,
    USDC_PAGE,
};

fn midday() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn rising_closes() -> Vec<f64> {
    let mut closes = vec![0.50, 0.49];
    closes.extend((0..60).map(|i| 0.50 + i as f64 * 0.001));
    closes
}

async fn mount_klines(server: &MockServer, closes: &[f64]) {
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(klines_body(closes)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn missing_credentials_means_zero_dispatch_attempts() {
    let server = MockServer::start().await;
    mount_page(&server, "/circle", USDC_PAGE).await;
    mount_klines(&server, &rising_closes()).await;
    Mock::given(method("POST"))
        .and(path_regex("^/bot.*/sendMessage$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server, vec![source(&server, "Circle Blog", "/circle")]);
    config.heartbeat_enabled = true;

    let runtime = WatchRuntime::from_config(config).expect("runtime");
    assert!(!runtime.dispatch_enabled());

    let mut store = MemorySnapshotStore::new();
    let midnight = Utc.with_ymd_and_hms(2024, 6, 1, 0, 3, 0).unwrap();
    let report = runtime.run_once(&mut store, midnight).await;

    assert!(!report.dispatch_enabled);
    assert!(!report.heartbeat_sent);
    assert_eq!(report.config_errors, 1);
    assert_eq!(report.detector.as_ref().unwrap().alerts.len(), 1);
    assert_eq!(report.signals.as_ref().unwrap().alerts.len(), 2);
    assert!(store.is_empty());
    assert_eq!(report.exit_code(false), 0);
}

#[tokio::test]
async fn rejected_settings_count_towards_strict_exit() {
    let server = MockServer::start().await;
    mount_page(&server, "/circle", QUIET_PAGE).await;

    let mut config = test_config(&server, vec![source(&server, "Circle Blog", "/circle")]);
    config.prices_enabled = false;
    config.rejected_keys = vec!["FETCH_TIMEOUT_SECONDS".to_string()];

    let fetcher = HttpPageFetcher::new(&config.http).unwrap();
    let runtime = WatchRuntime::new(
        config,
        Some(RecordingNotifier::new() as Arc<dyn Notifier>),
        Arc::new(fetcher),
        Arc::new(StaticCloses(Vec::new())),
    );

    let mut store = MemorySnapshotStore::new();
    let report = runtime.run_once(&mut store, midday()).await;

    assert_eq!(report.config_errors, 1);
    assert_eq!(report.exit_code(false), 0);
    assert_eq!(report.exit_code(true), 1);
}

#[tokio::test]
async fn full_run_delivers_heartbeat_page_and_signal_alerts() {
    let server = MockServer::start().await;
    mount_page(&server, "/circle", USDC_PAGE).await;

    let config = test_config(&server, vec![source(&server, "Circle Blog", "/circle")]);
    let config = signalwatch::config::Config {
        heartbeat_enabled: true,
        ..config
    };
    let notifier = RecordingNotifier::new();
    let fetcher = HttpPageFetcher::new(&config.http).unwrap();
    let runtime = WatchRuntime::new(
        config,
        Some(notifier.clone() as Arc<dyn Notifier>),
        Arc::new(fetcher),
        Arc::new(StaticCloses(rising_closes())),
    );

    let mut store = MemorySnapshotStore::new();
    let midnight = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 30).unwrap();
    let report = runtime.run_once(&mut store, midnight).await;

    assert!(report.heartbeat_sent);
    assert_eq!(report.detector.as_ref().unwrap().delivered, 1);
    assert_eq!(report.signals.as_ref().unwrap().delivered, 2);
    assert_eq!(report.error_count(), 0);
    assert_eq!(store.len(), 1);

    let messages = notifier.messages();
    assert_eq!(messages.len(), 4);
    assert!(messages[0].contains("alive"));
    assert!(messages[1].contains("Circle Blog"));
    assert!(messages[2].contains("RSI overbought"));
    assert!(messages[3].contains("bullish MA cross"));

    // Page alert is suppressed on the next run, signal alerts repeat
    let report = runtime.run_once(&mut store, midday()).await;
    assert!(!report.heartbeat_sent);
    assert_eq!(report.detector.as_ref().unwrap().delivered, 0);
    assert_eq!(report.signals.as_ref().unwrap().delivered, 2);
    assert_eq!(notifier.messages().len(), 6);
}

#[tokio::test]
async fn short_price_series_only_aborts_signal_engine() {
    let server = MockServer::start().await;
    mount_page(&server, "/circle", USDC_PAGE).await;
    mount_klines(&server, &[0.5, 0.51, 0.52]).await;

    let config = test_config(&server, vec![source(&server, "Circle Blog", "/circle")]);
    let notifier = RecordingNotifier::new();
    let fetcher = HttpPageFetcher::new(&config.http).unwrap();
    let provider =
        signalwatch::services::BinanceKlinesProvider::new(&config.signals, &config.http).unwrap();
    let runtime = WatchRuntime::new(
        config,
        Some(notifier.clone() as Arc<dyn Notifier>),
        Arc::new(fetcher),
        Arc::new(provider),
    );

    let mut store = MemorySnapshotStore::new();
    let report = runtime.run_once(&mut store, midday()).await;

    let signals = report.signals.as_ref().unwrap();
    assert!(signals.reading.is_none());
    assert_eq!(signals.errors, 1);
    assert_eq!(report.detector.as_ref().unwrap().delivered, 1);
    assert_eq!(report.exit_code(false), 0);
    assert_eq!(report.exit_code(true), 1);
}

#[tokio::test]
async fn disabled_subsystems_are_skipped() {
    let server = MockServer::start().await;
    let mut config = test_config(&server, vec![source(&server, "Circle Blog", "/circle")]);
    config.pages_enabled = false;
    config.prices_enabled = false;

    let runtime = WatchRuntime::from_config(config).unwrap();
    let mut store = MemorySnapshotStore::new();
    let report = runtime.run_once(&mut store, midday()).await;

    assert!(report.detector.is_none());
    assert!(report.signals.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}
