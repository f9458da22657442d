//! signalwatch
//!
//! Runs one pass of page change detection and price signal evaluation, then
//! exits. Meant to be triggered by cron or a CI schedule.

use std::process::ExitCode;

use dotenvy::dotenv;
use signalwatch::config::{get_environment, Config};
use signalwatch::core::runtime::WatchRuntime;
use signalwatch::logging;
use signalwatch::snapshot::{FileSnapshotStore, SnapshotStore};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment variables from .env if present
    dotenv().ok();

    // Logging first so configuration warnings are visible
    logging::init_logging(&get_environment());
    let config = Config::from_env();

    info!(environment = %config.environment, "Starting signalwatch");

    let strict = config.strict_exit;
    let snapshot_path = config.detector.snapshot_path.clone();

    let runtime = match WatchRuntime::from_config(config) {
        Ok(runtime) => runtime,
        Err(e) => {
            // Only reachable when the TLS backend cannot initialise.
            error!(error = %e, "Failed to initialise HTTP clients");
            return ExitCode::from(if strict { 1 } else { 0 });
        }
    };

    let mut store = FileSnapshotStore::load(&snapshot_path);
    info!(path = %snapshot_path.display(), entries = store.len(), "Snapshot loaded");

    let report = runtime.run_once(&mut store, chrono::Utc::now()).await;

    ExitCode::from(report.exit_code(strict) as u8)
}

