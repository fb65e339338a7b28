use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{post_json, require};
use crate::application::config::EmailConfig;
use crate::domain::entities::alert::Alert;
use crate::domain::ports::notifier::{ChannelConfigError, NotificationChannel, NotificationError};
use crate::domain::value_objects::severity::Severity;

/// Email delivered through an HTTP mail relay (`POST` with a bearer key).
pub struct EmailChannel {
    api_url: String,
    api_key: String,
    from: String,
    to: Vec<String>,
    client: Client,
}

#[derive(Serialize)]
struct EmailMessage<'a> {
    from: &'a str,
    to: &'a [String],
    subject: String,
    html: String,
    text: &'a str,
}

impl EmailChannel {
    /// # Errors
    ///
    /// Returns `ChannelConfigError::MissingSetting` for the first required
    /// setting that is absent.
    pub fn from_config(config: &EmailConfig, client: Client) -> Result<Self, ChannelConfigError> {
        let api_url = require(config.api_url.as_ref(), "email", "api_url")?;
        let api_key = require(config.api_key.as_ref(), "email", "api_key")?;
        let from = require(config.from.as_ref(), "email", "from")?;
        let to = require(config.to.as_ref(), "email", "to")?;
        Ok(Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
            to: parse_recipients(to),
            client,
        })
    }

    fn subject(alert: &Alert) -> String {
        format!("[{}] {}", alert.severity, alert.title)
    }

    fn html(alert: &Alert) -> String {
        let color = match alert.severity {
            Severity::Critical => "#dc3545",
            Severity::Warning => "#ffc107",
            Severity::Good => "#28a745",
        };
        format!(
            "<h2 style=\"color:{color}\">{title}</h2>\
             <pre style=\"font-family:monospace\">{message}</pre>\
             <p><small>{timestamp}</small></p>",
            title = escape_html(&alert.title),
            message = escape_html(&alert.message),
            timestamp = alert.timestamp.to_rfc3339(),
        )
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
        let message = EmailMessage {
            from: &self.from,
            to: &self.to,
            subject: Self::subject(alert),
            html: Self::html(alert),
            text: &alert.message,
        };
        let request = self.client.post(&self.api_url).bearer_auth(&self.api_key);
        post_json(request, &message).await
    }
}

fn parse_recipients(to: &str) -> Vec<String> {
    to.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
