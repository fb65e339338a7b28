pub mod email;
pub mod slack;
pub mod telegram;
pub mod webhook;

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::application::config::NotificationConfig;
use crate::domain::ports::notifier::{ChannelConfigError, NotificationChannel, NotificationError};

pub use email::EmailChannel;
pub use slack::SlackChannel;
pub use telegram::{TelegramChannel, TelegramClient};
pub use webhook::WebhookChannel;

/// Maximum response body bytes included in error messages.
const MAX_ERROR_BODY: usize = 256;

/// Build the HTTP client shared by all channels.
///
/// # Errors
///
/// Returns `NotificationError::ChannelUnavailable` if the TLS backend cannot
/// be initialized.
pub fn http_client(timeout: Duration) -> Result<Client, NotificationError> {
    Client::builder().timeout(timeout).build().map_err(|e| {
        NotificationError::ChannelUnavailable(format!("failed to build HTTP client: {e}"))
    })
}

/// Build every enabled channel. A channel missing a required setting is
/// logged and left out; the others are unaffected.
#[must_use]
pub fn create_channels(config: &NotificationConfig, client: &Client) -> Vec<Box<dyn NotificationChannel>> {
    let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();

    if config.email.enabled {
        push_or_warn(&mut channels, EmailChannel::from_config(&config.email, client.clone()));
    }
    if config.webhook.enabled {
        push_or_warn(&mut channels, WebhookChannel::from_config(&config.webhook, client.clone()));
    }
    if config.slack.enabled {
        push_or_warn(&mut channels, SlackChannel::from_config(&config.slack, client.clone()));
    }
    if config.telegram.enabled {
        push_or_warn(&mut channels, TelegramChannel::from_config(&config.telegram, client.clone()));
    }

    for channel in &channels {
        tracing::info!("Notification channel enabled: {}", channel.name());
    }
    channels
}

fn push_or_warn<C: NotificationChannel + 'static>(
    channels: &mut Vec<Box<dyn NotificationChannel>>,
    channel: Result<C, ChannelConfigError>,
) {
    match channel {
        Ok(c) => channels.push(Box::new(c)),
        Err(e) => tracing::warn!("{e}; channel disabled"),
    }
}

/// Return a required setting or the error naming it.
fn require<'a>(
    value: Option<&'a String>,
    channel: &'static str,
    setting: &'static str,
) -> Result<&'a str, ChannelConfigError> {
    value
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ChannelConfigError::MissingSetting { channel, setting })
}

/// POST a JSON payload and map non-2xx answers to `SendFailed`.
async fn post_json<T: Serialize + ?Sized>(
    request: reqwest::RequestBuilder,
    payload: &T,
) -> Result<(), NotificationError> {
    let resp = request.json(payload).send().await.map_err(|e| {
        if e.is_timeout() {
            NotificationError::SendFailed(format!("request timed out: {e}"))
        } else {
            NotificationError::SendFailed(e.to_string())
        }
    })?;

    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    let body: String = body.chars().take(MAX_ERROR_BODY).collect();
    Err(NotificationError::SendFailed(format!("HTTP {status}: {body}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::{SlackConfig, TelegramConfig, WebhookConfig};

    #[test]
    fn nothing_enabled_builds_no_channels() {
        let channels = create_channels(&NotificationConfig::default(), &Client::new());
        assert!(channels.is_empty());
    }

    #[test]
    fn misconfigured_channel_is_skipped_others_kept() {
        let config = NotificationConfig {
            slack: SlackConfig {
                enabled: true,
                webhook_url: None,
            },
            webhook: WebhookConfig {
                enabled: true,
                url: Some("https://example.com/hook".into()),
                headers: Default::default(),
            },
            telegram: TelegramConfig {
                enabled: true,
                bot_token: Some("123:abc".into()),
                chat_id: Some("  ".into()),
                ..TelegramConfig::default()
            },
            ..NotificationConfig::default()
        };
        let channels = create_channels(&config, &Client::new());
        let names: Vec<&str> = channels.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["webhook"]);
    }

    #[test]
    fn require_rejects_blank() {
        let blank = String::from(" ");
        assert!(require(Some(&blank), "slack", "webhook_url").is_err());
        assert!(require(None, "slack", "webhook_url").is_err());
        let set = String::from("x");
        assert_eq!(require(Some(&set), "slack", "webhook_url"), Ok("x"));
    }
}
