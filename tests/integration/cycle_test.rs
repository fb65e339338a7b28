#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use chainwatch::application::config::{EndpointConfig, EndpointKind};
use chainwatch::application::services::SharedStatus;
use chainwatch::application::services::dispatcher::NotificationDispatcher;
use chainwatch::application::services::monitor::{HealthCheckOrchestrator, ProbeSet};
use chainwatch::application::services::reporter::StatusReporter;
use chainwatch::domain::entities::status::StatusStore;
use chainwatch::domain::rules::classification::TargetClassifier;
use chainwatch::domain::value_objects::severity::Severity;
use chainwatch::infrastructure::persistence::in_memory::InMemoryRepository;
use tokio::sync::RwLock;

use crate::common::{RecordingChannel, ScriptedConsole, ScriptedRpc, ScriptedSupervisor};

struct Harness {
    console: ScriptedConsole,
    rpc: ScriptedRpc,
    supervisor: ScriptedSupervisor,
    dispatcher: NotificationDispatcher,
    delivered: Arc<std::sync::Mutex<Vec<chainwatch::domain::entities::alert::Alert>>>,
    repo: InMemoryRepository,
    classifier: TargetClassifier,
    endpoints: Vec<EndpointConfig>,
    status: SharedStatus,
}

impl Harness {
    fn new(endpoints: Vec<EndpointConfig>) -> Self {
        let channel = RecordingChannel::new("recorder", false);
        let delivered = Arc::clone(&channel.delivered);
        Self {
            console: ScriptedConsole::default(),
            rpc: ScriptedRpc::default(),
            supervisor: ScriptedSupervisor::default(),
            dispatcher: NotificationDispatcher::new(vec![Box::new(channel)], Duration::from_secs(5)),
            delivered,
            repo: InMemoryRepository::new(),
            classifier: TargetClassifier::default(),
            endpoints,
            status: Arc::new(RwLock::new(StatusStore::new())),
        }
    }

    fn orchestrator(&self) -> HealthCheckOrchestrator<'_> {
        let probes = ProbeSet {
            console: Some(&self.console),
            http: &self.rpc,
            websocket: &self.rpc,
            supervisor: Some(&self.supervisor),
        };
        HealthCheckOrchestrator::new(
            probes,
            &self.dispatcher,
            &self.repo,
            &self.classifier,
            &self.endpoints,
            Arc::clone(&self.status),
        )
    }

    fn reporter(&self) -> StatusReporter {
        StatusReporter::new(Arc::clone(&self.status))
    }

    fn delivered_titles(&self) -> Vec<String> {
        self.delivered
            .lock()
            .expect("mutex poisoned")
            .iter()
            .map(|a| a.title.clone())
            .collect()
    }
}

fn http_endpoint(name: &str, url: &str) -> EndpointConfig {
    EndpointConfig {
        name: name.into(),
        url: url.into(),
        kind: EndpointKind::Http,
    }
}

// ---------------------------------------------------------------------------
// Scenario A: a healthy validator goes down
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validator_going_down_raises_one_critical_alert() {
    let h = Harness::new(Vec::new());
    h.console.set_healthy("node3");
    let orchestrator = h.orchestrator();

    let first = orchestrator.run_cycle().await;
    assert_eq!(first.alerts_count, 0);
    let first_check = h.status.read().await.last_check.expect("last check set");

    h.console.set_failing("node3", "connection refused");
    let second = orchestrator.run_cycle().await;

    assert_eq!(second.alerts_count, 1);
    let store = h.status.read().await;
    let node3 = store.validators.get("node3").expect("node3 stored");
    assert!(!node3.healthy);
    assert_eq!(node3.error(), Some("connection refused"));
    assert_eq!(store.alerts.len(), 1);
    assert_eq!(store.alerts[0].severity, Severity::Critical);
    assert!(store.alerts[0].title.contains("Node Down"));
    assert!(store.last_check.expect("last check set") >= first_check);
    assert_eq!(h.delivered_titles(), vec!["VALIDATOR Node Down".to_string()]);
}

// ---------------------------------------------------------------------------
// Scenario B: one of three supervised services stops
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stopped_service_raises_single_degraded_alert() {
    let h = Harness::new(Vec::new());
    h.supervisor
        .set(&[("api", "online"), ("indexer", "online"), ("relayer", "online")]);
    let orchestrator = h.orchestrator();
    orchestrator.run_cycle().await;

    h.supervisor
        .set(&[("api", "online"), ("indexer", "stopped"), ("relayer", "online")]);
    let cycle = orchestrator.run_cycle().await;

    assert_eq!(cycle.alerts_count, 1);
    let report = h.reporter().report().await;
    assert_eq!(report.summary.total_services, 3);
    assert_eq!(report.summary.online_services, 2);
    let alert = &report.details.alerts[0];
    assert_eq!(alert.title, "Service Down");
    assert_eq!(alert.target.as_deref(), Some("indexer"));
    assert_eq!(alert.severity, Severity::Critical);
}

// ---------------------------------------------------------------------------
// Scenario C: nothing to monitor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_environment_completes_with_zero_counts() {
    let h = Harness::new(Vec::new());
    let cycle = h.orchestrator().run_cycle().await;

    assert_eq!(cycle.targets_checked, 0);
    assert_eq!(cycle.alerts_count, 0);
    assert!(cycle.persisted);
    let report = h.reporter().report().await;
    assert!(report.details.last_check.is_some());
    assert_eq!(report.summary.total_validators, 0);
    assert_eq!(report.summary.total_rpc_nodes, 0);
    assert_eq!(report.summary.total_services, 0);
    assert!(report.details.alerts.is_empty());
}

// ---------------------------------------------------------------------------
// Transition properties
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_observation_never_alerts_even_when_unhealthy() {
    let h = Harness::new(vec![http_endpoint("Archive", "http://archive:8545")]);
    h.console.set_failing("node12", "fatal: database corrupted");
    h.rpc.set_down("http://archive:8545", "connection refused");
    h.supervisor.set(&[("api", "errored")]);

    let cycle = h.orchestrator().run_cycle().await;

    assert_eq!(cycle.unhealthy, 3);
    assert_eq!(cycle.alerts_count, 0);
    assert!(h.delivered_titles().is_empty());
}

#[tokio::test]
async fn flip_down_then_up_alerts_once_each_way() {
    let url = "http://localhost:80";
    let h = Harness::new(vec![http_endpoint("Local RPC", url)]);
    let orchestrator = h.orchestrator();

    orchestrator.run_cycle().await;
    h.rpc.set_down(url, "connection refused");
    orchestrator.run_cycle().await;
    orchestrator.run_cycle().await;
    h.rpc.set_up(url);
    orchestrator.run_cycle().await;
    orchestrator.run_cycle().await;

    assert_eq!(
        h.delivered_titles(),
        vec![
            "RPC Endpoint Down".to_string(),
            "RPC Endpoint Recovered".to_string()
        ]
    );
    let store = h.status.read().await;
    assert_eq!(store.alerts.len(), 2);
    assert_eq!(store.alerts[0].severity, Severity::Good);
    assert_eq!(store.alerts[1].severity, Severity::Critical);
}

#[tokio::test]
async fn unchanged_health_produces_no_alerts() {
    let h = Harness::new(Vec::new());
    h.console.set_healthy("node1");
    h.console.set_failing("node11", "panic: runtime error");
    let orchestrator = h.orchestrator();

    for _ in 0..3 {
        let cycle = orchestrator.run_cycle().await;
        assert_eq!(cycle.alerts_count, 0);
    }
    assert!(h.status.read().await.alerts.is_empty());
}

#[tokio::test]
async fn every_stored_result_belongs_to_the_latest_cycle() {
    let h = Harness::new(Vec::new());
    h.console.set_healthy("node1");
    h.supervisor.set(&[("api", "online")]);
    let orchestrator = h.orchestrator();
    orchestrator.run_cycle().await;

    // api vanishes from the supervisor listing
    h.supervisor.set(&[]);
    let cycle = orchestrator.run_cycle().await;

    let store = h.status.read().await;
    assert!(store.services.is_empty());
    assert_eq!(cycle.targets_checked, 1);
    for r in store.validators.values() {
        assert!(r.observed_at >= cycle.started_at);
    }
}

#[tokio::test]
async fn report_is_stable_between_cycles() {
    let h = Harness::new(Vec::new());
    h.console.set_healthy("node2");
    h.orchestrator().run_cycle().await;

    let reporter = h.reporter();
    let a = reporter.report().await;
    let b = reporter.report().await;
    assert_eq!(a.summary, b.summary);
    assert_eq!(a.details, b.details);
}

#[tokio::test]
async fn each_cycle_is_persisted() {
    let h = Harness::new(Vec::new());
    let orchestrator = h.orchestrator();
    orchestrator.run_cycle().await;
    orchestrator.run_cycle().await;
    assert_eq!(h.repo.saved_count(), 2);
}
