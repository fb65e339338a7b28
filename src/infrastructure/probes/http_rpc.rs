use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::entities::health::{ProbeDetail, ProbeOutcome};
use crate::domain::ports::probe::{ProbeError, RpcProbe};

/// JSON-RPC health check: asks the node for its current block number.
pub struct HttpRpcProbe {
    client: reqwest::Client,
}

impl HttpRpcProbe {
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RpcProbe for HttpRpcProbe {
    async fn probe(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
        let request = json!({
            "jsonrpc": "2.0",
            "method": "eth_blockNumber",
            "params": [],
            "id": 1,
        });
        let resp = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        assess_response(status, &body)
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Healthy iff HTTP 200 with a non-empty `result`.
fn assess_response(status: u16, body: &str) -> Result<ProbeOutcome, ProbeError> {
    if status != 200 {
        return Err(ProbeError::InvalidResponse(format!("HTTP {status}")));
    }
    let parsed: RpcResponse = serde_json::from_str(body)
        .map_err(|e| ProbeError::InvalidResponse(format!("not a JSON-RPC response: {e}")))?;

    let block = match parsed.result {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            let reason = parsed
                .error
                .map_or_else(|| "empty result".to_string(), |e| format!("RPC error: {e}"));
            return Err(ProbeError::InvalidResponse(reason));
        }
    };

    Ok(ProbeOutcome::healthy(ProbeDetail {
        block_number: Some(block),
        ..ProbeDetail::default()
    }))
}
