#![allow(clippy::expect_used, dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chainwatch::domain::entities::alert::Alert;
use chainwatch::domain::entities::health::{ProbeDetail, ProbeOutcome};
use chainwatch::domain::entities::service::ServiceInfo;
use chainwatch::domain::ports::notifier::{NotificationChannel, NotificationError};
use chainwatch::domain::ports::probe::{ConsoleProbe, ProbeError, RpcProbe, SupervisorProbe};

// ---------------------------------------------------------------------------
// Scripted probes: state is changed between cycles by the test
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ScriptedConsole {
    sessions: Mutex<HashMap<String, Result<bool, String>>>,
}

impl ScriptedConsole {
    pub fn set_healthy(&self, name: &str) {
        self.sessions
            .lock()
            .expect("mutex poisoned")
            .insert(name.to_string(), Ok(true));
    }

    pub fn set_failing(&self, name: &str, error: &str) {
        self.sessions
            .lock()
            .expect("mutex poisoned")
            .insert(name.to_string(), Err(error.to_string()));
    }
}

#[async_trait]
impl ConsoleProbe for ScriptedConsole {
    async fn list_live_targets(&self) -> Result<Vec<String>, ProbeError> {
        Ok(self
            .sessions
            .lock()
            .expect("mutex poisoned")
            .keys()
            .cloned()
            .collect())
    }

    async fn probe(&self, name: &str) -> Result<ProbeOutcome, ProbeError> {
        match self.sessions.lock().expect("mutex poisoned").get(name) {
            Some(Ok(_)) => Ok(ProbeOutcome::healthy(ProbeDetail {
                output: Some("Imported new chain segment".into()),
                ..ProbeDetail::default()
            })),
            Some(Err(error)) => Ok(ProbeOutcome {
                healthy: false,
                detail: ProbeDetail {
                    error: Some(error.clone()),
                    output: Some(format!("ERROR {error}")),
                    ..ProbeDetail::default()
                },
            }),
            None => Err(ProbeError::CommandFailed(format!("can't find session: {name}"))),
        }
    }
}

#[derive(Default)]
pub struct ScriptedRpc {
    down: Mutex<HashMap<String, String>>,
}

impl ScriptedRpc {
    pub fn set_down(&self, url: &str, error: &str) {
        self.down
            .lock()
            .expect("mutex poisoned")
            .insert(url.to_string(), error.to_string());
    }

    pub fn set_up(&self, url: &str) {
        self.down.lock().expect("mutex poisoned").remove(url);
    }
}

#[async_trait]
impl RpcProbe for ScriptedRpc {
    async fn probe(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
        match self.down.lock().expect("mutex poisoned").get(url) {
            Some(error) => Err(ProbeError::Transport(error.clone())),
            None => Ok(ProbeOutcome::healthy(ProbeDetail {
                block_number: Some("0x2a".into()),
                ..ProbeDetail::default()
            })),
        }
    }
}

#[derive(Default)]
pub struct ScriptedSupervisor {
    services: Mutex<Vec<ServiceInfo>>,
}

impl ScriptedSupervisor {
    pub fn set(&self, services: &[(&str, &str)]) {
        *self.services.lock().expect("mutex poisoned") = services
            .iter()
            .map(|(name, status)| service(name, status))
            .collect();
    }
}

#[async_trait]
impl SupervisorProbe for ScriptedSupervisor {
    async fn list_services(&self) -> Result<Vec<ServiceInfo>, ProbeError> {
        Ok(self.services.lock().expect("mutex poisoned").clone())
    }
}

pub fn service(name: &str, status: &str) -> ServiceInfo {
    ServiceInfo {
        name: name.to_string(),
        status: status.to_string(),
        pid: (status == "online").then_some(1000),
        uptime_ms: None,
        restart_count: 0,
        memory_bytes: 50 * 1024 * 1024,
        cpu_percent: 1.0,
    }
}

// ---------------------------------------------------------------------------
// Recording channel
// ---------------------------------------------------------------------------

pub struct RecordingChannel {
    name: &'static str,
    fail: bool,
    pub delivered: Arc<Mutex<Vec<Alert>>>,
    pub attempts: Arc<AtomicUsize>,
}

impl RecordingChannel {
    pub fn new(name: &'static str, fail: bool) -> Self {
        Self {
            name,
            fail,
            delivered: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        self.name
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NotificationError::SendFailed("connection reset".into()));
        }
        self.delivered
            .lock()
            .expect("mutex poisoned")
            .push(alert.clone());
        Ok(())
    }
}
