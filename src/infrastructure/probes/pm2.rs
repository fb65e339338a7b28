use async_trait::async_trait;
use serde::Deserialize;

use super::run_command;
use crate::domain::entities::service::ServiceInfo;
use crate::domain::ports::probe::{ProbeError, SupervisorProbe};

/// Lists services managed by pm2 via `pm2 jlist`.
pub struct Pm2Probe {
    binary: String,
}

impl Pm2Probe {
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for Pm2Probe {
    fn default() -> Self {
        Self::new("pm2")
    }
}

#[async_trait]
impl SupervisorProbe for Pm2Probe {
    async fn list_services(&self) -> Result<Vec<ServiceInfo>, ProbeError> {
        let stdout = run_command(&self.binary, &["jlist"]).await?;
        parse_jlist(&stdout)
    }
}

#[derive(Deserialize)]
struct Pm2Process {
    name: String,
    #[serde(default)]
    pid: Option<u32>,
    #[serde(default)]
    pm2_env: Pm2Env,
    #[serde(default)]
    monit: Pm2Monit,
}

#[derive(Deserialize, Default)]
struct Pm2Env {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    pm_uptime: Option<i64>,
    #[serde(default)]
    restart_time: u32,
}

#[derive(Deserialize, Default)]
struct Pm2Monit {
    #[serde(default)]
    memory: u64,
    #[serde(default)]
    cpu: f64,
}

/// Parse `pm2 jlist` output. pm2 may print banner lines (some of them
/// starting with `[PM2]`) before the JSON array; they are skipped.
fn parse_jlist(stdout: &str) -> Result<Vec<ServiceInfo>, ProbeError> {
    let start = json_array_start(stdout)
        .ok_or_else(|| ProbeError::InvalidResponse("no JSON array in pm2 output".into()))?;
    let processes: Vec<Pm2Process> = serde_json::from_str(stdout[start..].trim_end())
        .map_err(|e| ProbeError::InvalidResponse(format!("failed to parse pm2 jlist: {e}")))?;

    Ok(processes
        .into_iter()
        .map(|p| ServiceInfo {
            name: p.name,
            status: p.pm2_env.status.unwrap_or_else(|| "unknown".into()),
            pid: p.pid.filter(|pid| *pid > 0),
            uptime_ms: p.pm2_env.pm_uptime,
            restart_count: p.pm2_env.restart_time,
            memory_bytes: p.monit.memory,
            cpu_percent: p.monit.cpu,
        })
        .collect())
}

/// Offset of the first `[` that opens a JSON array of objects (or an empty
/// one), as opposed to a bracketed banner tag.
fn json_array_start(stdout: &str) -> Option<usize> {
    stdout.match_indices('[').map(|(i, _)| i).find(|&i| {
        matches!(
            stdout[i + 1..].trim_start().chars().next(),
            Some('{' | ']')
        )
    })
}
