#![allow(clippy::expect_used)]

use std::sync::atomic::Ordering;
use std::time::Duration;

use chainwatch::application::services::dispatcher::NotificationDispatcher;
use chainwatch::domain::entities::alert::Alert;
use chainwatch::domain::entities::status::{MAX_ALERTS, StatusStore};
use chainwatch::domain::value_objects::severity::Severity;

use crate::common::RecordingChannel;

#[tokio::test]
async fn failing_channel_is_isolated() {
    let failing = RecordingChannel::new("webhook", true);
    let succeeding = RecordingChannel::new("slack", false);
    let failing_attempts = std::sync::Arc::clone(&failing.attempts);
    let delivered = std::sync::Arc::clone(&succeeding.delivered);
    let dispatcher = NotificationDispatcher::new(
        vec![Box::new(failing), Box::new(succeeding)],
        Duration::from_secs(5),
    );

    let mut store = StatusStore::new();
    let alert = Alert::new("Service Down", "Service \"api\" is stopped.", Severity::Critical);
    let report = dispatcher.dispatch(alert, &mut store).await;

    assert_eq!(store.alerts.len(), 1);
    assert_eq!(store.alerts[0].title, "Service Down");
    assert_eq!(delivered.lock().expect("mutex poisoned").len(), 1);
    assert_eq!(failing_attempts.load(Ordering::SeqCst), 1);
    assert_eq!(report.delivered, vec!["slack".to_string()]);
    assert_eq!(report.failed.len(), 1);
}

#[tokio::test]
async fn alert_history_stays_bounded_through_dispatch() {
    let dispatcher = NotificationDispatcher::new(Vec::new(), Duration::from_secs(5));
    let mut store = StatusStore::new();

    for i in 0..=MAX_ALERTS {
        let alert = Alert::new(format!("alert {i}"), "", Severity::Warning);
        dispatcher.dispatch(alert, &mut store).await;
    }

    assert_eq!(store.alerts.len(), MAX_ALERTS);
    assert_eq!(store.alerts[0].title, format!("alert {MAX_ALERTS}"));
    assert_eq!(store.alerts[MAX_ALERTS - 1].title, "alert 1");
}
