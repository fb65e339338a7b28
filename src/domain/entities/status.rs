use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alert::Alert;
use super::health::HealthResult;
use crate::domain::value_objects::category::TargetCategory;

/// Upper bound on the retained alert history.
pub const MAX_ALERTS: usize = 100;

/// Latest known health of every tracked target plus the recent alert history.
///
/// Maps are keyed by target name and ordered, so renderings and persisted
/// files are stable across cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusStore {
    #[serde(default)]
    pub validators: BTreeMap<String, HealthResult>,
    #[serde(default)]
    pub rpc_nodes: BTreeMap<String, HealthResult>,
    #[serde(default)]
    pub services: BTreeMap<String, HealthResult>,
    #[serde(default)]
    pub last_check: Option<DateTime<Utc>>,
    /// Most recent first.
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl StatusStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn targets(&self, category: TargetCategory) -> &BTreeMap<String, HealthResult> {
        match category {
            TargetCategory::Validator => &self.validators,
            TargetCategory::RpcNode => &self.rpc_nodes,
            TargetCategory::Service => &self.services,
        }
    }

    pub fn targets_mut(&mut self, category: TargetCategory) -> &mut BTreeMap<String, HealthResult> {
        match category {
            TargetCategory::Validator => &mut self.validators,
            TargetCategory::RpcNode => &mut self.rpc_nodes,
            TargetCategory::Service => &mut self.services,
        }
    }

    #[must_use]
    pub fn get(&self, category: TargetCategory, name: &str) -> Option<&HealthResult> {
        self.targets(category).get(name)
    }

    /// Store a result under its own category, replacing any earlier entry.
    pub fn upsert(&mut self, result: HealthResult) {
        self.targets_mut(result.category)
            .insert(result.target.clone(), result);
    }

    /// Prepend an alert and evict the oldest beyond [`MAX_ALERTS`].
    pub fn record_alert(&mut self, alert: Alert) {
        self.alerts.insert(0, alert);
        self.alerts.truncate(MAX_ALERTS);
    }

    #[must_use]
    pub fn recent_alerts(&self, limit: usize) -> &[Alert] {
        &self.alerts[..limit.min(self.alerts.len())]
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.validators.len() + self.rpc_nodes.len() + self.services.len()
    }
}
