use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::health::ProbeOutcome;
use crate::domain::entities::service::ServiceInfo;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("probe timed out after {0}s")]
    Timeout(u64),
    #[error("probe unavailable: {0}")]
    Unavailable(String),
}

/// Probes processes running inside a terminal multiplexer.
#[async_trait]
pub trait ConsoleProbe: Send + Sync {
    /// List the names of live console sessions.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError` if the multiplexer cannot be queried.
    async fn list_live_targets(&self) -> Result<Vec<String>, ProbeError>;

    /// Inspect the recent console output of one session.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError` if the session output cannot be captured.
    async fn probe(&self, name: &str) -> Result<ProbeOutcome, ProbeError>;
}

/// Probes a network RPC endpoint.
#[async_trait]
pub trait RpcProbe: Send + Sync {
    /// # Errors
    ///
    /// Returns `ProbeError` on transport failure or an unusable response.
    async fn probe(&self, url: &str) -> Result<ProbeOutcome, ProbeError>;
}

/// Lists the services managed by the process supervisor.
#[async_trait]
pub trait SupervisorProbe: Send + Sync {
    /// # Errors
    ///
    /// Returns `ProbeError` if the supervisor cannot be queried or its
    /// listing cannot be parsed.
    async fn list_services(&self) -> Result<Vec<ServiceInfo>, ProbeError>;
}
