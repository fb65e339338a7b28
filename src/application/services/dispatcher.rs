use std::time::Duration;

use futures::future::join_all;

use crate::domain::entities::alert::Alert;
use crate::domain::entities::status::StatusStore;
use crate::domain::ports::notifier::{NotificationChannel, NotificationError};

/// Outcome of fanning one alert out to every enabled channel.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<String>,
    pub failed: Vec<(String, NotificationError)>,
}

impl DispatchReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Delivers alerts to all enabled channels and records them in the store.
pub struct NotificationDispatcher {
    channels: Vec<Box<dyn NotificationChannel>>,
    timeout: Duration,
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(channels: Vec<Box<dyn NotificationChannel>>, timeout: Duration) -> Self {
        Self { channels, timeout }
    }

    #[must_use]
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels
            .iter()
            .filter(|c| c.enabled())
            .map(|c| c.name())
            .collect()
    }

    /// Record the alert in `store` and deliver it to every enabled channel.
    ///
    /// The alert is recorded whatever the delivery outcome. Returns once every
    /// channel has finished or hit its timeout.
    pub async fn dispatch(&self, alert: Alert, store: &mut StatusStore) -> DispatchReport {
        let report = self.deliver(&alert).await;
        store.record_alert(alert);
        report
    }

    /// Deliver without recording. Used for test notifications.
    pub async fn deliver(&self, alert: &Alert) -> DispatchReport {
        let attempts = self
            .channels
            .iter()
            .filter(|c| c.enabled())
            .map(|channel| async move {
                let result = match tokio::time::timeout(self.timeout, channel.deliver(alert)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(NotificationError::Timeout(self.timeout.as_secs())),
                };
                (channel.name().to_string(), result)
            });

        let mut report = DispatchReport::default();
        for (name, result) in join_all(attempts).await {
            match result {
                Ok(()) => {
                    tracing::debug!(channel = %name, title = %alert.title, "Alert delivered");
                    report.delivered.push(name);
                }
                Err(e) => {
                    tracing::warn!(channel = %name, "Alert delivery failed: {e}");
                    report.failed.push((name, e));
                }
            }
        }
        report
    }
}
