use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{post_json, require};
use crate::application::config::WebhookConfig;
use crate::domain::entities::alert::Alert;
use crate::domain::ports::notifier::{ChannelConfigError, NotificationChannel, NotificationError};
use crate::domain::value_objects::severity::Severity;

/// Webhook notification format, auto-detected from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebhookFormat {
    Discord,
    Generic,
}

/// Posts alerts as JSON to an arbitrary HTTP endpoint, with optional custom
/// headers. Discord webhook URLs get an embed payload instead.
pub struct WebhookChannel {
    url: String,
    headers: Vec<(String, String)>,
    client: Client,
}

impl WebhookChannel {
    /// # Errors
    ///
    /// Returns `ChannelConfigError::MissingSetting` if no URL is configured.
    pub fn from_config(config: &WebhookConfig, client: Client) -> Result<Self, ChannelConfigError> {
        let url = require(config.url.as_ref(), "webhook", "url")?;
        Ok(Self {
            url: url.to_string(),
            headers: config
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            client,
        })
    }

    fn detect_format(&self) -> WebhookFormat {
        // Extract host from URL (scheme://host/path) to avoid substring false positives
        let host = self
            .url
            .split("//")
            .nth(1)
            .and_then(|s| s.split('/').next())
            .and_then(|h| h.split(':').next())
            .unwrap_or("");

        if host == "discord.com" || host == "discordapp.com" {
            WebhookFormat::Discord
        } else {
            WebhookFormat::Generic
        }
    }

    const fn severity_color_decimal(severity: Severity) -> u32 {
        match severity {
            Severity::Good => 0x00_2E_CC_71,
            Severity::Warning => 0x00_E6_7E_22,
            Severity::Critical => 0x00_E7_4C_3C,
        }
    }

    fn format_alert(&self, alert: &Alert) -> Value {
        match self.detect_format() {
            WebhookFormat::Discord => Self::format_discord(alert),
            WebhookFormat::Generic => Self::format_generic(alert),
        }
    }

    fn format_discord(alert: &Alert) -> Value {
        json!({
            "username": "chainwatch",
            "embeds": [{
                "title": format!("{} {}", alert.severity.emoji(), alert.title),
                "description": &alert.message,
                "color": Self::severity_color_decimal(alert.severity),
                "timestamp": alert.timestamp.to_rfc3339()
            }]
        })
    }

    fn format_generic(alert: &Alert) -> Value {
        json!({
            "source": "chainwatch",
            "title": &alert.title,
            "message": &alert.message,
            "severity": alert.severity,
            "target": &alert.target,
            "timestamp": alert.timestamp.to_rfc3339()
        })
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
        let mut request = self.client.post(&self.url);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        post_json(request, &self.format_alert(alert)).await
    }
}
