//! Error taxonomy shared by every component.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, WatchError>;

#[derive(Debug, Error)]
pub enum WatchError {
    /// Network failure, timeout or non-2xx status
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Malformed document or payload
    #[error("Parse error: {0}")]
    Parse(String),

    /// Message delivery failed
    #[error("Notify error: {0}")]
    Notify(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Price series shorter than the evaluation window
    #[error("Insufficient data: need {required} closes, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Snapshot I/O error: {0}")]
    Snapshot(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WatchError {
    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            WatchError::Fetch(_) => "fetch",
            WatchError::Parse(_) => "parse",
            WatchError::Notify(_) => "notify",
            WatchError::Config(_) => "config",
            WatchError::InsufficientData { .. } => "insufficient_data",
            WatchError::Snapshot(_) => "snapshot",
            WatchError::Json(_) => "json",
        }
    }
}
