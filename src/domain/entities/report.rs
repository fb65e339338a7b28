use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::StatusStore;

/// Derived counts over a [`StatusStore`]. Always recomputed, never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total_validators: usize,
    pub healthy_validators: usize,
    pub total_rpc_nodes: usize,
    pub healthy_rpc_nodes: usize,
    pub total_services: usize,
    pub online_services: usize,
}

impl StatusSummary {
    #[must_use]
    pub fn from_store(store: &StatusStore) -> Self {
        Self {
            total_validators: store.validators.len(),
            healthy_validators: store.validators.values().filter(|r| r.healthy).count(),
            total_rpc_nodes: store.rpc_nodes.len(),
            healthy_rpc_nodes: store.rpc_nodes.values().filter(|r| r.healthy).count(),
            total_services: store.services.len(),
            online_services: store
                .services
                .values()
                .filter(|r| r.detail.service.as_ref().is_some_and(|s| s.is_online()))
                .count(),
        }
    }

    #[must_use]
    pub const fn all_healthy(&self) -> bool {
        self.healthy_validators == self.total_validators
            && self.healthy_rpc_nodes == self.total_rpc_nodes
            && self.online_services == self.total_services
    }
}

/// Read-only view handed to the dashboard and the chat bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub timestamp: DateTime<Utc>,
    pub summary: StatusSummary,
    pub details: StatusStore,
}

impl StatusReport {
    #[must_use]
    pub fn from_store(store: &StatusStore, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            summary: StatusSummary::from_store(store),
            details: store.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::health::{HealthResult, ProbeDetail, ProbeOutcome};
    use crate::domain::entities::service::ServiceInfo;
    use crate::domain::value_objects::category::TargetCategory;

    fn service_result(name: &str, status: &str) -> HealthResult {
        let info = ServiceInfo {
            name: name.into(),
            status: status.into(),
            pid: None,
            uptime_ms: None,
            restart_count: 0,
            memory_bytes: 0,
            cpu_percent: 0.0,
        };
        HealthResult::from_outcome(
            name,
            TargetCategory::Service,
            ProbeOutcome {
                healthy: info.is_online(),
                detail: ProbeDetail {
                    service: Some(info),
                    ..ProbeDetail::default()
                },
            },
            Utc::now(),
        )
    }

    fn node_result(name: &str, category: TargetCategory, healthy: bool) -> HealthResult {
        HealthResult::from_outcome(
            name,
            category,
            ProbeOutcome {
                healthy,
                detail: ProbeDetail::default(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn empty_store_has_zero_counts() {
        let summary = StatusSummary::from_store(&StatusStore::new());
        assert_eq!(summary, StatusSummary::default());
        assert!(summary.all_healthy());
    }

    #[test]
    fn counts_per_category() {
        let mut store = StatusStore::new();
        store.upsert(node_result("node1", TargetCategory::Validator, true));
        store.upsert(node_result("node2", TargetCategory::Validator, false));
        store.upsert(node_result("Local RPC", TargetCategory::RpcNode, true));
        store.upsert(service_result("api", "online"));
        store.upsert(service_result("indexer", "stopped"));

        let summary = StatusSummary::from_store(&store);
        assert_eq!(summary.total_validators, 2);
        assert_eq!(summary.healthy_validators, 1);
        assert_eq!(summary.total_rpc_nodes, 1);
        assert_eq!(summary.healthy_rpc_nodes, 1);
        assert_eq!(summary.total_services, 2);
        assert_eq!(summary.online_services, 1);
        assert!(!summary.all_healthy());
    }

    #[test]
    fn service_without_info_is_not_online() {
        let mut store = StatusStore::new();
        store.upsert(node_result("ghost", TargetCategory::Service, true));
        assert_eq!(StatusSummary::from_store(&store).online_services, 0);
    }

    #[test]
    fn report_serializes_camel_case_summary() {
        let report = StatusReport::from_store(&StatusStore::new(), Utc::now());
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["summary"]["totalRpcNodes"], 0);
        assert_eq!(json["summary"]["onlineServices"], 0);
        assert!(json["details"]["alerts"].is_array());
    }
}
