//! One-shot runtime: heartbeat, page checks, price signals.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::heartbeat::is_heartbeat_window;
use crate::detector::{ChangeDetector, DetectorReport};
use crate::error::Result;
use crate::notify::{format, Notifier, TelegramNotifier};
use crate::services::{BinanceKlinesProvider, HttpPageFetcher, MarketDataProvider, PageFetcher};
use crate::signals::{SignalEngine, SignalReport};
use crate::snapshot::SnapshotStore;

#[derive(Debug, Default, Clone)]
pub struct RunReport {
    pub dispatch_enabled: bool,
    pub heartbeat_sent: bool,
    pub config_errors: usize,
    pub detector: Option<DetectorReport>,
    pub signals: Option<SignalReport>,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.config_errors
            + self.detector.as_ref().map_or(0, |r| r.errors)
            + self.signals.as_ref().map_or(0, |r| r.errors)
    }

    /// 0 unless `strict` is set and something went wrong
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && self.error_count() > 0 {
            1
        } else {
            0
        }
    }
}

pub struct WatchRuntime {
    config: Config,
    notifier: Option<Arc<dyn Notifier>>,
    detector: Option<ChangeDetector>,
    engine: Option<SignalEngine>,
    config_errors: usize,
}

impl WatchRuntime {
    /// Wire the production collaborators. Missing bot credentials disable
    /// dispatch here, before any fetch happens.
    pub fn from_config(config: Config) -> Result<Self> {
        let mut missing_credentials = 0;
        let notifier: Option<Arc<dyn Notifier>> = match config.telegram_credentials() {
            Ok(credentials) => {
                let telegram =
                    TelegramNotifier::new(&config.telegram_api_url, credentials, &config.http)?;
                Some(Arc::new(telegram) as Arc<dyn Notifier>)
            }
            Err(e) => {
                warn!(error = %e, "Telegram not configured, alerts will only be logged");
                missing_credentials += 1;
                None
            }
        };

        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(&config.http)?);
        let provider: Arc<dyn MarketDataProvider> =
            Arc::new(BinanceKlinesProvider::new(&config.signals, &config.http)?);

        let mut runtime = Self::new(config, notifier, fetcher, provider);
        runtime.config_errors += missing_credentials;
        Ok(runtime)
    }

    /// Build with injected collaborators. Settings rejected while loading
    /// `config` count as configuration errors of every run.
    pub fn new(
        config: Config,
        notifier: Option<Arc<dyn Notifier>>,
        fetcher: Arc<dyn PageFetcher>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        let detector = config
            .pages_enabled
            .then(|| ChangeDetector::new(&config.detector, fetcher));
        let engine = config
            .prices_enabled
            .then(|| SignalEngine::new(&config.signals, provider));

        let config_errors = config.rejected_keys.len();
        if config_errors > 0 {
            warn!(keys = %config.rejected_keys.join(","), "Configuration has rejected settings");
        }

        Self {
            config,
            notifier,
            detector,
            engine,
            config_errors,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dispatch_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Run every enabled subsystem once. Never fails; problems end up in the
    /// report and the log.
    pub async fn run_once(&self, store: &mut dyn SnapshotStore, now: DateTime<Utc>) -> RunReport {
        let notifier = self.notifier.as_deref();
        let mut report = RunReport {
            dispatch_enabled: notifier.is_some(),
            config_errors: self.config_errors,
            ..RunReport::default()
        };

        if self.config.heartbeat_enabled && is_heartbeat_window(now) {
            if let Some(notifier) = notifier {
                match notifier.send(&format::heartbeat()).await {
                    Ok(()) => {
                        report.heartbeat_sent = true;
                        info!("Heartbeat sent");
                    }
                    Err(e) => error!(error = %e, "Heartbeat delivery failed"),
                }
            }
        }

        if let Some(detector) = &self.detector {
            info!(sources = detector.sources().len(), "Checking pages");
            report.detector = Some(detector.run(store, notifier, now).await);
        }

        if let Some(engine) = &self.engine {
            info!(symbol = %self.config.signals.symbol, "Evaluating price signals");
            report.signals = Some(engine.run(notifier, now).await);
        }

        log_summary(&report);
        report
    }
}

fn log_summary(report: &RunReport) {
    let (checked, skipped, page_alerts, page_delivered) = report
        .detector
        .as_ref()
        .map_or((0, 0, 0, 0), |r| (r.checked, r.skipped, r.alerts.len(), r.delivered));
    let (signal_alerts, signal_delivered) = report
        .signals
        .as_ref()
        .map_or((0, 0), |r| (r.alerts.len(), r.delivered));

    info!(
        dispatch_enabled = report.dispatch_enabled,
        heartbeat = report.heartbeat_sent,
        pages_checked = checked,
        pages_skipped = skipped,
        page_alerts = page_alerts,
        page_alerts_delivered = page_delivered,
        signal_alerts = signal_alerts,
        signal_alerts_delivered = signal_delivered,
        errors = report.error_count(),
        "Run complete"
    );
}
