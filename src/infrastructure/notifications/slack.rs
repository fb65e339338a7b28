use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{post_json, require};
use crate::application::config::SlackConfig;
use crate::domain::entities::alert::Alert;
use crate::domain::ports::notifier::{ChannelConfigError, NotificationChannel, NotificationError};
use crate::domain::value_objects::severity::Severity;

/// Slack incoming-webhook channel using colored attachments.
pub struct SlackChannel {
    webhook_url: String,
    client: Client,
}

impl SlackChannel {
    /// # Errors
    ///
    /// Returns `ChannelConfigError::MissingSetting` if no webhook URL is configured.
    pub fn from_config(config: &SlackConfig, client: Client) -> Result<Self, ChannelConfigError> {
        let url = require(config.webhook_url.as_ref(), "slack", "webhook_url")?;
        Ok(Self {
            webhook_url: url.to_string(),
            client,
        })
    }

    const fn color(severity: Severity) -> &'static str {
        match severity {
            Severity::Critical => "danger",
            Severity::Warning => "warning",
            Severity::Good => "good",
        }
    }

    fn format_alert(alert: &Alert) -> Value {
        json!({
            "text": format!("{} {}", alert.severity.emoji(), alert.title),
            "attachments": [{
                "color": Self::color(alert.severity),
                "title": &alert.title,
                "text": &alert.message,
                "footer": "chainwatch",
                "ts": alert.timestamp.timestamp()
            }]
        })
    }
}

#[async_trait]
impl NotificationChannel for SlackChannel {
    fn name(&self) -> &str {
        "slack"
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
        post_json(self.client.post(&self.webhook_url), &Self::format_alert(alert)).await
    }
}
