use serde::{Deserialize, Serialize};

/// Status value the supervisor reports for a running service.
pub const ONLINE_STATUS: &str = "online";

/// One entry of the process supervisor's service listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub pid: Option<u32>,
    /// Epoch milliseconds at which the service was last started.
    #[serde(default)]
    pub uptime_ms: Option<i64>,
    #[serde(default)]
    pub restart_count: u32,
    #[serde(default)]
    pub memory_bytes: u64,
    #[serde(default)]
    pub cpu_percent: f64,
}

impl ServiceInfo {
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status == ONLINE_STATUS
    }

    #[must_use]
    pub const fn memory_mb(&self) -> u64 {
        self.memory_bytes / (1024 * 1024)
    }
}
