//! Change detector: keyword-gated page alerts with repeat suppression.
//!
//! Per source: fetch → extract → keyword match → fingerprint → compare with
//! the snapshot. A changed fingerprint is persisted before the alert is
//! dispatched, so a crash between the two can lose an alert but never send
//! the same content twice.

pub mod extract;
pub mod fingerprint;
pub mod keywords;

pub use extract::{extract_document, ExtractedDocument, TitledElement};
pub use fingerprint::fingerprint;
pub use keywords::KeywordMatcher;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::config::DetectorConfig;
use crate::error::Result;
use crate::models::{Alert, Excerpt, Source};
use crate::notify::{format, Notifier};
use crate::services::PageFetcher;
use crate::snapshot::SnapshotStore;

/// Outcome of inspecting one fetched document
#[derive(Debug, Clone)]
pub enum Inspection {
    /// No keyword present; the snapshot is left alone
    NoMatch,
    /// Keywords present but content identical to the last alert
    Unchanged,
    Changed { alert: Alert, fingerprint: String },
}

#[derive(Debug, Default, Clone)]
pub struct DetectorReport {
    pub checked: usize,
    pub skipped: usize,
    pub matched: usize,
    pub alerts: Vec<Alert>,
    pub delivered: usize,
    pub errors: usize,
}

pub struct ChangeDetector {
    sources: Vec<Source>,
    matcher: KeywordMatcher,
    max_excerpts: usize,
    fetcher: Arc<dyn PageFetcher>,
}

impl ChangeDetector {
    pub fn new(config: &DetectorConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            sources: config.sources.clone(),
            matcher: KeywordMatcher::new(&config.keywords, config.whole_words),
            max_excerpts: config.max_excerpts,
            fetcher,
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Pure decision step for one document against its previous fingerprint
    pub fn inspect(
        &self,
        source: &Source,
        body: &str,
        previous: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Inspection> {
        let document = extract_document(body)?;

        let keywords = self.matcher.matches(&document.text);
        if keywords.is_empty() {
            return Ok(Inspection::NoMatch);
        }

        let fingerprint = fingerprint(body);
        if previous == Some(fingerprint.as_str()) {
            return Ok(Inspection::Unchanged);
        }

        let excerpts = document
            .titled
            .into_iter()
            .filter(|element| self.matcher.first_match(&element.text).is_some())
            .take(self.max_excerpts)
            .map(|element| Excerpt {
                title: element.text,
                link: element.link,
            })
            .collect();

        let alert = Alert {
            source: source.name.clone(),
            endpoint: source.endpoint.clone(),
            keywords,
            timestamp: now,
            excerpts,
        };

        Ok(Inspection::Changed { alert, fingerprint })
    }

    /// Check every source once; alerts are stamped with `now`.
    ///
    /// With `notifier == None` dispatch is disabled: alerts are computed and
    /// logged but the snapshot is not touched, since nothing was queued.
    pub async fn run(
        &self,
        store: &mut dyn SnapshotStore,
        notifier: Option<&dyn Notifier>,
        now: DateTime<Utc>,
    ) -> DetectorReport {
        let mut report = DetectorReport::default();

        for source in &self.sources {
            report.checked += 1;

            let body = match self.fetcher.fetch(&source.endpoint).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(source = %source.name, kind = e.kind(), error = %e, "Fetch failed, skipping source");
                    report.skipped += 1;
                    report.errors += 1;
                    continue;
                }
            };

            let previous = store.get(&source.name).map(str::to_string);
            let inspection = match self.inspect(source, &body, previous.as_deref(), now) {
                Ok(inspection) => inspection,
                Err(e) => {
                    warn!(source = %source.name, kind = e.kind(), error = %e, "Document rejected, skipping source");
                    report.skipped += 1;
                    report.errors += 1;
                    continue;
                }
            };

            let (alert, fingerprint) = match inspection {
                Inspection::NoMatch => {
                    debug!(source = %source.name, "No keywords found");
                    continue;
                }
                Inspection::Unchanged => {
                    report.matched += 1;
                    debug!(source = %source.name, "Content unchanged since last alert");
                    continue;
                }
                Inspection::Changed { alert, fingerprint } => {
                    report.matched += 1;
                    (alert, fingerprint)
                }
            };

            info!(
                source = %source.name,
                keywords = %alert.keywords.join(","),
                excerpts = alert.excerpts.len(),
                "Change detected"
            );

            let Some(notifier) = notifier else {
                info!(source = %source.name, "Dispatch disabled, snapshot left unchanged");
                report.alerts.push(alert);
                continue;
            };

            if let Err(e) = store.record(&source.name, &fingerprint) {
                error!(source = %source.name, error = %e, "Snapshot write failed, alert not sent");
                report.errors += 1;
                continue;
            }

            match notifier.send(&format::page_alert(&alert)).await {
                Ok(()) => {
                    report.delivered += 1;
                    info!(source = %source.name, "Alert sent");
                }
                Err(e) => {
                    report.errors += 1;
                    error!(source = %source.name, error = %e, "Alert delivery failed");
                }
            }
            report.alerts.push(alert);
        }

        report
    }
}
