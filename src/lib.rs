//! signalwatch: page change detection and price signal alerts.
//!
//! One invocation runs the change detector over a list of web pages, the
//! signal engine over a price series, and pushes alerts through a notifier.
//! Scheduling is left to an external cron / CI trigger.

pub mod config;
pub mod core;
pub mod detector;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod notify;
pub mod services;
pub mod signals;
pub mod snapshot;

pub use error::{Result, WatchError};
