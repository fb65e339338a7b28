use std::collections::BTreeSet;
use std::future::Future;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::join_all;

use super::SharedStatus;
use super::dispatcher::NotificationDispatcher;
use crate::application::config::{EndpointConfig, EndpointKind};
use crate::domain::entities::health::{HealthResult, ProbeDetail, ProbeOutcome};
use crate::domain::entities::service::ServiceInfo;
use crate::domain::entities::status::StatusStore;
use crate::domain::ports::probe::{ConsoleProbe, ProbeError, RpcProbe, SupervisorProbe};
use crate::domain::ports::store::StatusRepository;
use crate::domain::rules::alerts::{TargetSource, transition_alert};
use crate::domain::rules::classification::TargetClassifier;
use crate::domain::value_objects::category::TargetCategory;
use crate::domain::value_objects::transition::Transition;

const UNKNOWN_STATUS: &str = "unknown";

/// Result of a single health-check cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub targets_checked: usize,
    pub unhealthy: usize,
    pub alerts_count: usize,
    pub persisted: bool,
}

/// Probe adapters used by a cycle. Console and supervisor probing can be
/// switched off.
#[derive(Clone, Copy)]
pub struct ProbeSet<'a> {
    pub console: Option<&'a dyn ConsoleProbe>,
    pub http: &'a dyn RpcProbe,
    pub websocket: &'a dyn RpcProbe,
    pub supervisor: Option<&'a dyn SupervisorProbe>,
}

/// Runs check cycles: probe → detect transitions → dispatch → persist.
pub struct HealthCheckOrchestrator<'a> {
    probes: ProbeSet<'a>,
    dispatcher: &'a NotificationDispatcher,
    repository: &'a dyn StatusRepository,
    classifier: &'a TargetClassifier,
    endpoints: &'a [EndpointConfig],
    expected_sessions: &'a [String],
    status: SharedStatus,
    probe_timeout: Duration,
}

impl<'a> HealthCheckOrchestrator<'a> {
    #[must_use]
    pub fn new(
        probes: ProbeSet<'a>,
        dispatcher: &'a NotificationDispatcher,
        repository: &'a dyn StatusRepository,
        classifier: &'a TargetClassifier,
        endpoints: &'a [EndpointConfig],
        status: SharedStatus,
    ) -> Self {
        Self {
            probes,
            dispatcher,
            repository,
            classifier,
            endpoints,
            expected_sessions: &[],
            status,
            probe_timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub const fn with_expected_sessions(mut self, sessions: &'a [String]) -> Self {
        self.expected_sessions = sessions;
        self
    }

    #[must_use]
    pub const fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    #[must_use]
    pub fn status(&self) -> &SharedStatus {
        &self.status
    }

    /// Run one full cycle. Never fails: probe, dispatch and persistence
    /// errors are logged and folded into the resulting state.
    pub async fn run_cycle(&self) -> CycleReport {
        let started_at = Utc::now();
        let previous = self.status.read().await.clone();

        let (console, endpoints, services) = tokio::join!(
            self.check_console(&previous),
            self.check_endpoints(),
            self.check_services(&previous),
        );

        let mut next = StatusStore {
            alerts: previous.alerts.clone(),
            ..StatusStore::default()
        };

        let mut alerts = Vec::new();
        let observed = console
            .into_iter()
            .map(|r| (r, TargetSource::Console))
            .chain(endpoints)
            .chain(services.into_iter().map(|r| (r, TargetSource::Supervisor)));
        for (result, source) in observed {
            let prior = previous.get(result.category, &result.target);
            let transition = Transition::classify(prior, &result);
            if let Some(alert) = transition_alert(transition, &result, source) {
                tracing::warn!(target_name = %result.target, "{}", alert.title);
                alerts.push(alert);
            }
            if next.get(result.category, &result.target).is_some() {
                tracing::warn!(
                    target_name = %result.target,
                    "Duplicate target name in {}; keeping the latest result",
                    result.category
                );
            }
            next.upsert(result);
        }

        let alerts_count = alerts.len();
        for alert in alerts {
            self.dispatcher.dispatch(alert, &mut next).await;
        }

        next.last_check = Some(started_at);

        let persisted = match self.repository.save(&next).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to persist status: {e}");
                false
            }
        };

        let targets_checked = next.target_count();
        let unhealthy = [
            TargetCategory::Validator,
            TargetCategory::RpcNode,
            TargetCategory::Service,
        ]
        .iter()
        .flat_map(|c| next.targets(*c).values())
        .filter(|r| !r.healthy)
        .count();

        *self.status.write().await = next;

        if alerts_count == 0 {
            tracing::debug!("{targets_checked} target(s) checked, no transitions");
        } else {
            tracing::info!("{targets_checked} target(s) checked, {alerts_count} transition(s)");
        }

        CycleReport {
            started_at,
            targets_checked,
            unhealthy,
            alerts_count,
            persisted,
        }
    }

    /// Persist the current snapshot outside of a cycle (used at shutdown).
    pub async fn flush(&self) -> bool {
        let store = self.status.read().await;
        match self.repository.save(&store).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to flush status: {e}");
                false
            }
        }
    }

    /// Await a probe under the per-probe timeout, folding failures into an
    /// unhealthy outcome.
    async fn observe(
        &self,
        probe: impl Future<Output = Result<ProbeOutcome, ProbeError>>,
    ) -> ProbeOutcome {
        match tokio::time::timeout(self.probe_timeout, probe).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => ProbeOutcome::unhealthy(e.to_string()),
            Err(_) => ProbeOutcome::unhealthy(
                ProbeError::Timeout(self.probe_timeout.as_secs()).to_string(),
            ),
        }
    }

    async fn check_console(&self, previous: &StatusStore) -> Vec<HealthResult> {
        let Some(probe) = self.probes.console else {
            return Vec::new();
        };

        let listed =
            tokio::time::timeout(self.probe_timeout, probe.list_live_targets()).await;
        let live: Vec<String> = match listed {
            Ok(Ok(sessions)) => sessions
                .into_iter()
                .filter(|s| self.classifier.is_tracked(s))
                .collect(),
            Ok(Err(e)) => {
                tracing::warn!("Console session listing failed: {e}");
                self.previous_console_targets(previous)
            }
            Err(_) => {
                tracing::warn!(
                    "Console session listing timed out after {}s",
                    self.probe_timeout.as_secs()
                );
                self.previous_console_targets(previous)
            }
        };

        let names: BTreeSet<String> = live
            .into_iter()
            .chain(self.expected_sessions.iter().cloned())
            .collect();

        let checks = names.iter().map(|name| async move {
            let outcome = self.observe(probe.probe(name)).await;
            HealthResult::from_outcome(
                name,
                self.classifier.classify(name),
                outcome,
                Utc::now(),
            )
        });
        join_all(checks).await
    }

    /// Console targets known from the previous cycle, excluding configured
    /// endpoints which share the RPC map.
    fn previous_console_targets(&self, previous: &StatusStore) -> Vec<String> {
        previous
            .validators
            .keys()
            .chain(previous.rpc_nodes.keys())
            .filter(|name| !self.endpoints.iter().any(|e| &e.name == *name))
            .cloned()
            .collect()
    }

    async fn check_endpoints(&self) -> Vec<(HealthResult, TargetSource<'a>)> {
        let checks = self.endpoints.iter().map(|endpoint| async move {
            let probe = match endpoint.kind {
                EndpointKind::Http => self.probes.http,
                EndpointKind::WebSocket => self.probes.websocket,
            };
            let start = Instant::now();
            let mut outcome = self.observe(probe.probe(&endpoint.url)).await;
            let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            outcome.detail.latency_ms.get_or_insert(elapsed);
            (
                HealthResult::from_outcome(
                    &endpoint.name,
                    TargetCategory::RpcNode,
                    outcome,
                    Utc::now(),
                ),
                TargetSource::Endpoint {
                    url: endpoint.url.as_str(),
                },
            )
        });
        join_all(checks).await
    }

    async fn check_services(&self, previous: &StatusStore) -> Vec<HealthResult> {
        let Some(probe) = self.probes.supervisor else {
            return Vec::new();
        };

        let error = match tokio::time::timeout(self.probe_timeout, probe.list_services()).await {
            Ok(Ok(services)) => {
                let now = Utc::now();
                return services
                    .into_iter()
                    .map(|info| {
                        let name = info.name.clone();
                        HealthResult::from_outcome(
                            &name,
                            TargetCategory::Service,
                            service_outcome(info),
                            now,
                        )
                    })
                    .collect();
            }
            Ok(Err(e)) => e,
            Err(_) => ProbeError::Timeout(self.probe_timeout.as_secs()),
        };

        tracing::warn!("Supervisor listing failed: {error}");
        let now = Utc::now();
        previous
            .services
            .values()
            .map(|prior| {
                let mut info = prior
                    .detail
                    .service
                    .clone()
                    .unwrap_or_else(|| placeholder_service(&prior.target));
                UNKNOWN_STATUS.clone_into(&mut info.status);
                info.pid = None;
                let outcome = ProbeOutcome {
                    healthy: false,
                    detail: ProbeDetail {
                        error: Some(error.to_string()),
                        service: Some(info),
                        ..ProbeDetail::default()
                    },
                };
                HealthResult::from_outcome(&prior.target, TargetCategory::Service, outcome, now)
            })
            .collect()
    }
}

fn service_outcome(info: ServiceInfo) -> ProbeOutcome {
    let healthy = info.is_online();
    let error = (!healthy).then(|| format!("service is {}", info.status));
    ProbeOutcome {
        healthy,
        detail: ProbeDetail {
            error,
            service: Some(info),
            ..ProbeDetail::default()
        },
    }
}

fn placeholder_service(name: &str) -> ServiceInfo {
    ServiceInfo {
        name: name.to_string(),
        status: UNKNOWN_STATUS.to_string(),
        pid: None,
        uptime_ms: None,
        restart_count: 0,
        memory_bytes: 0,
        cpu_percent: 0.0,
    }
}
