use std::time::Duration;

use async_trait::async_trait;
use tokio_tungstenite::connect_async;

use crate::domain::entities::health::{ProbeDetail, ProbeOutcome};
use crate::domain::ports::probe::{ProbeError, RpcProbe};

/// WebSocket endpoint check: healthy iff the handshake completes in time.
pub struct WebSocketProbe {
    handshake_timeout: Duration,
}

impl WebSocketProbe {
    #[must_use]
    pub const fn new(handshake_timeout: Duration) -> Self {
        Self { handshake_timeout }
    }
}

#[async_trait]
impl RpcProbe for WebSocketProbe {
    async fn probe(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
        let (mut ws, _) = tokio::time::timeout(self.handshake_timeout, connect_async(url))
            .await
            .map_err(|_| ProbeError::Timeout(self.handshake_timeout.as_secs()))?
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        if let Err(e) = ws.close(None).await {
            tracing::debug!(url, "WebSocket close failed: {e}");
        }
        Ok(ProbeOutcome::healthy(ProbeDetail::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let probe = WebSocketProbe::new(Duration::from_secs(2));
        // port 9 (discard) is closed on test hosts
        let err = probe.probe("ws://127.0.0.1:9").await;
        assert!(matches!(err, Err(ProbeError::Transport(_))));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let probe = WebSocketProbe::new(Duration::from_secs(2));
        assert!(probe.probe("not a url").await.is_err());
    }
}
