use chrono::Utc;

use super::SharedStatus;
use crate::domain::entities::alert::Alert;
use crate::domain::entities::report::StatusReport;

/// Read-only access to the shared status for the dashboard, bot and CLI.
#[derive(Clone)]
pub struct StatusReporter {
    status: SharedStatus,
}

impl StatusReporter {
    #[must_use]
    pub const fn new(status: SharedStatus) -> Self {
        Self { status }
    }

    /// Build a report from the latest completed snapshot. Counts are derived on
    /// every call.
    pub async fn report(&self) -> StatusReport {
        let store = self.status.read().await;
        StatusReport::from_store(&store, Utc::now())
    }

    /// Most recent alerts first.
    pub async fn recent_alerts(&self, limit: usize) -> Vec<Alert> {
        self.status.read().await.recent_alerts(limit).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::health::{HealthResult, ProbeDetail, ProbeOutcome};
    use crate::domain::entities::status::StatusStore;
    use crate::domain::value_objects::category::TargetCategory;
    use crate::domain::value_objects::severity::Severity;
    use tokio::sync::RwLock;

    fn seeded() -> SharedStatus {
        let mut store = StatusStore::new();
        store.upsert(HealthResult::from_outcome(
            "node1",
            TargetCategory::Validator,
            ProbeOutcome::healthy(ProbeDetail::default()),
            Utc::now(),
        ));
        store.upsert(HealthResult::from_outcome(
            "node12",
            TargetCategory::RpcNode,
            ProbeOutcome::unhealthy("connection refused"),
            Utc::now(),
        ));
        for i in 0..3 {
            store.record_alert(Alert::new(format!("alert {i}"), "", Severity::Warning));
        }
        SharedStatus::new(RwLock::new(store))
    }

    #[tokio::test]
    async fn report_is_idempotent_between_cycles() {
        let reporter = StatusReporter::new(seeded());
        let first = reporter.report().await;
        let second = reporter.report().await;
        assert_eq!(first.summary, second.summary);
        assert_eq!(first.details, second.details);
        assert_eq!(first.summary.total_validators, 1);
        assert_eq!(first.summary.healthy_rpc_nodes, 0);
    }

    #[tokio::test]
    async fn report_reflects_store_changes() {
        let status = seeded();
        let reporter = StatusReporter::new(status.clone());
        status.write().await.validators.clear();
        assert_eq!(reporter.report().await.summary.total_validators, 0);
    }

    #[tokio::test]
    async fn recent_alerts_are_newest_first_and_capped() {
        let reporter = StatusReporter::new(seeded());
        let alerts = reporter.recent_alerts(2).await;
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].title, "alert 2");
        assert_eq!(alerts[1].title, "alert 1");
    }
}
