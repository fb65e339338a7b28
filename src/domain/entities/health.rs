use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::service::ServiceInfo;
use crate::domain::value_objects::category::TargetCategory;

/// Metadata captured by a probe alongside the healthy flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw snippet of what the probe saw (console tail, response body).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceInfo>,
}

/// What a probe adapter reports for one target, before the orchestrator
/// attaches identity and time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub healthy: bool,
    pub detail: ProbeDetail,
}

impl ProbeOutcome {
    #[must_use]
    pub fn healthy(detail: ProbeDetail) -> Self {
        Self {
            healthy: true,
            detail,
        }
    }

    #[must_use]
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            detail: ProbeDetail {
                error: Some(error.into()),
                ..ProbeDetail::default()
            },
        }
    }
}

/// Health of one target as observed in one cycle. Never merged with an
/// earlier observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResult {
    pub target: String,
    pub category: TargetCategory,
    pub healthy: bool,
    pub observed_at: DateTime<Utc>,
    #[serde(default)]
    pub detail: ProbeDetail,
}

impl HealthResult {
    #[must_use]
    pub fn from_outcome(
        target: &str,
        category: TargetCategory,
        outcome: ProbeOutcome,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target: target.to_string(),
            category,
            healthy: outcome.healthy,
            observed_at,
            detail: outcome.detail,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.detail.error.as_deref()
    }
}
