//! Alert delivery.

pub mod format;
pub mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message. Any failure is a `WatchError::Notify`.
    async fn send(&self, text: &str) -> Result<()>;
}
