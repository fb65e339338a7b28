use crate::domain::entities::alert::Alert;
use crate::domain::entities::health::HealthResult;
use crate::domain::value_objects::transition::Transition;

/// Where a result came from; selects the wording of its alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource<'a> {
    /// A console session (validator or RPC node process).
    Console,
    /// A statically configured RPC endpoint.
    Endpoint { url: &'a str },
    /// A service reported by the process supervisor.
    Supervisor,
}

/// Build the alert for a transition, or `None` when nothing changed.
#[must_use]
pub fn transition_alert(
    transition: Transition,
    current: &HealthResult,
    source: TargetSource<'_>,
) -> Option<Alert> {
    let severity = transition.severity()?;
    let down = transition == Transition::Degraded;
    let name = current.target.as_str();
    let error = current.error().unwrap_or("Unknown error");

    let (title, message) = match source {
        TargetSource::Console => {
            let kind = current.category.label();
            if down {
                let output = current.detail.output.as_deref().unwrap_or("");
                (
                    format!("{kind} Node Down"),
                    format!("{name} has gone offline.\nError: {error}\nLast output:\n{output}"),
                )
            } else {
                (
                    format!("{kind} Node Recovered"),
                    format!("{name} is back online."),
                )
            }
        }
        TargetSource::Endpoint { url } => {
            let latency = current
                .detail
                .latency_ms
                .map_or_else(|| "n/a".to_string(), |ms| format!("{ms}ms"));
            if down {
                (
                    "RPC Endpoint Down".to_string(),
                    format!(
                        "{name} ({url}) is not responding.\nError: {error}\nResponse time: {latency}"
                    ),
                )
            } else {
                (
                    "RPC Endpoint Recovered".to_string(),
                    format!("{name} ({url}) is responding again.\nResponse time: {latency}"),
                )
            }
        }
        TargetSource::Supervisor => {
            let info = current.detail.service.as_ref();
            let pid = info
                .and_then(|s| s.pid)
                .map_or_else(|| "-".to_string(), |p| p.to_string());
            if down {
                let status = info.map_or("unknown", |s| s.status.as_str());
                let restarts = info.map_or(0, |s| s.restart_count);
                (
                    "Service Down".to_string(),
                    format!(
                        "Service \"{name}\" is {status}.\nPID: {pid}\nRestarts: {restarts}"
                    ),
                )
            } else {
                (
                    "Service Recovered".to_string(),
                    format!("Service \"{name}\" is back online.\nPID: {pid}"),
                )
            }
        }
    };

    Some(Alert::new(title, message, severity).for_target(name))
}
