#![allow(clippy::expect_used)]

use std::time::Duration;

use chainwatch::application::services::SharedStatus;
use chainwatch::application::services::dispatcher::NotificationDispatcher;
use chainwatch::application::services::load_status;
use chainwatch::application::services::monitor::{CycleReport, HealthCheckOrchestrator, ProbeSet};
use chainwatch::domain::ports::store::StatusRepository;
use chainwatch::domain::rules::classification::TargetClassifier;
use chainwatch::domain::value_objects::severity::Severity;
use chainwatch::infrastructure::persistence::json_file::JsonFileRepository;

use crate::common::{RecordingChannel, ScriptedConsole, ScriptedRpc};

fn fixture_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join("status.json")
}

#[tokio::test]
async fn fixture_loads_and_round_trips() {
    let repo = JsonFileRepository::new(fixture_path());
    let store = repo.load().expect("load").expect("fixture present");

    assert_eq!(store.validators.len(), 2);
    assert_eq!(store.rpc_nodes.len(), 1);
    assert_eq!(store.services.len(), 2);
    assert!(!store.validators["node2"].healthy);
    assert_eq!(store.alerts.len(), 2);
    assert_eq!(store.alerts[0].title, "VALIDATOR Node Down");

    let dir = tempfile::tempdir().expect("tempdir");
    let copy = JsonFileRepository::new(dir.path().join("status.json"));
    copy.save(&store).await.expect("save");
    let reloaded = copy.load().expect("load").expect("saved");
    assert_eq!(reloaded, store);
}

#[tokio::test]
async fn corrupted_file_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("status.json");
    std::fs::write(&path, "{\"validators\": [").expect("write");

    let status = load_status(&JsonFileRepository::new(&path));
    assert_eq!(status.read().await.target_count(), 0);
}

#[tokio::test]
async fn missing_file_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = load_status(&JsonFileRepository::new(dir.path().join("absent.json")));
    let store = status.read().await;
    assert!(store.last_check.is_none());
    assert!(store.alerts.is_empty());
}

// ---------------------------------------------------------------------------
// Restarts: the persisted snapshot is the baseline for the next process
// ---------------------------------------------------------------------------

/// One cycle of a freshly started process: status loaded from `repo`, then
/// probed with `console`.
async fn cycle_after_start(
    repo: &JsonFileRepository,
    console: &ScriptedConsole,
    channel: RecordingChannel,
) -> (CycleReport, SharedStatus) {
    let rpc = ScriptedRpc::default();
    let probes = ProbeSet {
        console: Some(console),
        http: &rpc,
        websocket: &rpc,
        supervisor: None,
    };
    let dispatcher = NotificationDispatcher::new(vec![Box::new(channel)], Duration::from_secs(5));
    let classifier = TargetClassifier::default();
    let status = load_status(repo);
    let orchestrator = HealthCheckOrchestrator::new(
        probes,
        &dispatcher,
        repo,
        &classifier,
        &[],
        std::sync::Arc::clone(&status),
    );
    let report = orchestrator.run_cycle().await;
    (report, status)
}

#[tokio::test]
async fn restart_neither_duplicates_nor_misses_alerts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = JsonFileRepository::new(dir.path().join("status.json"));
    let console = ScriptedConsole::default();

    // first process: node3 healthy, nothing to report
    console.set_healthy("node3");
    let (first, _) = cycle_after_start(&repo, &console, RecordingChannel::new("first", false)).await;
    assert!(first.persisted);
    assert_eq!(first.alerts_count, 0);

    // second process: node3 went down while nothing was running
    console.set_failing("node3", "connection refused");
    let channel = RecordingChannel::new("second", false);
    let delivered = std::sync::Arc::clone(&channel.delivered);
    let (second, status) = cycle_after_start(&repo, &console, channel).await;

    assert_eq!(second.alerts_count, 1);
    {
        let store = status.read().await;
        assert_eq!(store.alerts.len(), 1);
        assert_eq!(store.alerts[0].severity, Severity::Critical);
        assert!(store.alerts[0].title.contains("Node Down"));
    }
    assert_eq!(delivered.lock().expect("mutex poisoned").len(), 1);

    // third process: still down, the alert is not sent again
    let channel = RecordingChannel::new("third", false);
    let delivered = std::sync::Arc::clone(&channel.delivered);
    let (third, status) = cycle_after_start(&repo, &console, channel).await;

    assert_eq!(third.alerts_count, 0);
    assert!(delivered.lock().expect("mutex poisoned").is_empty());
    assert_eq!(status.read().await.alerts.len(), 1);

    let persisted = repo.load().expect("load").expect("saved");
    assert_eq!(persisted.alerts.len(), 1);
    assert!(!persisted.validators["node3"].healthy);
}
