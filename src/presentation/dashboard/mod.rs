//! Read-only JSON API over the latest status snapshot.

use std::io::SeekFrom;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::application::services::reporter::StatusReporter;
use crate::domain::entities::status::MAX_ALERTS;

const DEFAULT_ALERT_LIMIT: usize = 50;
const LOG_LINES: usize = 100;
/// The log file only grows; only this many trailing bytes are read per request.
const LOG_TAIL_BYTES: u64 = 64 * 1024;

pub struct DashboardState {
    pub reporter: StatusReporter,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    limit: Option<usize>,
}

pub fn router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/healthz", get(liveness_handler))
        .route("/api/status", get(status_handler))
        .route("/api/alerts", get(alerts_handler))
        .route("/api/logs", get(logs_handler))
        .with_state(state)
}

pub struct DashboardServer {
    state: Arc<DashboardState>,
    addr: SocketAddr,
}

impl DashboardServer {
    #[must_use]
    pub const fn new(state: Arc<DashboardState>, addr: SocketAddr) -> Self {
        Self { state, addr }
    }

    /// Serve until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn run(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let app = router(self.state);
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("Dashboard listening on {}", self.addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

async fn status_handler(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(state.reporter.report().await)
}

async fn alerts_handler(
    State(state): State<Arc<DashboardState>>,
    Query(query): Query<AlertsQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_ALERT_LIMIT).min(MAX_ALERTS);
    Json(state.reporter.recent_alerts(limit).await)
}

async fn logs_handler(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    let Some(path) = state.log_file.as_ref() else {
        return Json(Vec::<String>::new()).into_response();
    };
    match read_tail(path, LOG_TAIL_BYTES).await {
        Ok(content) => Json(recent_lines(&content, LOG_LINES)).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Json(Vec::<String>::new()).into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to read log file {}: {e}", path.display());
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read logs").into_response()
        }
    }
}

/// Read at most the last `max_bytes` of a file. When the read starts mid-file
/// the first, possibly partial, line is dropped.
async fn read_tail(path: &Path, max_bytes: u64) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    let start = len.saturating_sub(max_bytes);
    file.seek(SeekFrom::Start(start)).await?;

    let mut buf = Vec::new();
    file.take(max_bytes).read_to_end(&mut buf).await?;
    let text = String::from_utf8_lossy(&buf);
    let tail: &str = if start > 0 {
        text.split_once('\n').map_or("", |(_, rest)| rest)
    } else {
        &text
    };
    Ok(tail.to_string())
}

/// Last `n` non-empty lines, newest first.
fn recent_lines(content: &str, n: usize) -> Vec<String> {
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .rev()
        .take(n)
        .map(ToString::to_string)
        .collect()
}
