use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{post_json, require};
use crate::application::config::TelegramConfig;
use crate::domain::entities::alert::Alert;
use crate::domain::ports::notifier::{ChannelConfigError, NotificationChannel, NotificationError};
use crate::domain::value_objects::severity::Severity;

/// Telegram rejects messages longer than 4096 characters.
const MAX_MESSAGE_CHARS: usize = 4000;
const TRUNCATED_CHARS: usize = 3900;
const TRUNCATION_NOTICE: &str = "...\n\n_Message truncated_";

/// Minimal Telegram Bot API client shared by the alert channel and the bot.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl TelegramClient {
    #[must_use]
    pub fn new(client: Client, api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            token: token.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `ChannelConfigError::MissingSetting` if no bot token is configured.
    pub fn from_config(config: &TelegramConfig, client: Client) -> Result<Self, ChannelConfigError> {
        let token = require(config.bot_token.as_ref(), "telegram", "bot_token")?;
        Ok(Self::new(client, config.api_base.as_str(), token))
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base.trim_end_matches('/'),
            self.token
        )
    }

    /// Send a Markdown message. `silent` suppresses the push notification.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::SendFailed` on transport failure or a
    /// non-2xx answer.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        silent: bool,
    ) -> Result<(), NotificationError> {
        let payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_notification": silent,
        });
        post_json(self.client.post(self.method_url("sendMessage")), &payload).await
    }

    /// Long-poll for new updates starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the request fails or
    /// the API answers `ok: false`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_secs: u64,
    ) -> Result<Vec<Update>, NotificationError> {
        let mut query = vec![("timeout", poll_secs.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        let resp = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&query)
            // the shared client timeout is shorter than a long poll
            .timeout(Duration::from_secs(poll_secs + 10))
            .send()
            .await
            .map_err(|e| NotificationError::ChannelUnavailable(e.to_string()))?;
        let body: ApiResponse<Vec<Update>> = resp
            .json()
            .await
            .map_err(|e| NotificationError::ChannelUnavailable(format!("bad getUpdates body: {e}")))?;
        if !body.ok {
            return Err(NotificationError::ChannelUnavailable(
                body.description.unwrap_or_else(|| "getUpdates failed".into()),
            ));
        }
        Ok(body.result.unwrap_or_default())
    }
}

/// Sends alerts to a fixed Telegram chat.
pub struct TelegramChannel {
    client: TelegramClient,
    chat_id: String,
}

impl TelegramChannel {
    #[must_use]
    pub fn new(client: TelegramClient, chat_id: impl Into<String>) -> Self {
        Self {
            client,
            chat_id: chat_id.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `ChannelConfigError::MissingSetting` if the bot token or chat id
    /// is not configured.
    pub fn from_config(config: &TelegramConfig, client: Client) -> Result<Self, ChannelConfigError> {
        let telegram = TelegramClient::from_config(config, client)?;
        let chat_id = require(config.chat_id.as_ref(), "telegram", "chat_id")?;
        Ok(Self::new(telegram, chat_id))
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
        let text = format_alert(alert);
        self.client
            .send_message(&self.chat_id, &text, alert.severity.is_silent())
            .await
    }
}

const fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "\u{1F6A8}",
        Severity::Warning => "\u{26A0}\u{FE0F}",
        Severity::Good => "\u{2705}",
    }
}

fn format_alert(alert: &Alert) -> String {
    let text = format!(
        "{} *{}*\n\n{}\n\n_{}_",
        icon(alert.severity),
        alert.title,
        alert.message,
        alert.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    truncate_message(text)
}

/// Keep messages under the Bot API limit.
pub fn truncate_message(text: String) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text;
    }
    let mut cut: String = text.chars().take(TRUNCATED_CHARS).collect();
    cut.push_str(TRUNCATION_NOTICE);
    cut
}
