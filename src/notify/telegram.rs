//! Telegram bot API notifier (`sendMessage`, HTML parse mode)

use async_trait::async_trait;
use tracing::debug;

use crate::config::{HttpConfig, TelegramCredentials};
use crate::error::{Result, WatchError};
use crate::notify::Notifier;

pub struct TelegramNotifier {
    api_url: String,
    credentials: TelegramCredentials,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(api_url: &str, credentials: TelegramCredentials, http: &HttpConfig) -> Result<Self> {
        let client =
            crate::services::build_http_client(&http.user_agent, http.notify_timeout_seconds)?;
        Ok(Self::with_client(api_url, credentials, client))
    }

    pub fn with_client(api_url: &str, credentials: TelegramCredentials, client: reqwest::Client) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
            client,
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.credentials.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let form = [
            ("chat_id", self.credentials.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "HTML"),
        ];

        // The URL embeds the bot token, keep it out of error messages.
        let response = self
            .client
            .post(self.send_message_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| WatchError::Notify(format!("sendMessage request failed: {}", e.without_url())))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::Notify(format!(
                "sendMessage returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        debug!(chars = text.chars().count(), "Telegram message delivered");
        Ok(())
    }
}
