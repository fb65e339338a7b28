use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::alert::Alert;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
    #[error("notification timed out after {0}s")]
    Timeout(u64),
}

/// A required setting is missing for a channel that was asked to be enabled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelConfigError {
    #[error("{channel} channel enabled but `{setting}` is not set")]
    MissingSetting {
        channel: &'static str,
        setting: &'static str,
    },
}

/// A notification sink (email, webhook, chat, bot).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &str;

    fn enabled(&self) -> bool {
        true
    }

    /// Deliver one alert.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the alert could not be delivered.
    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError>;
}
