use std::future::Future;
use std::time::Duration;

use crate::application::services::monitor::HealthCheckOrchestrator;

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Run check cycles at a fixed interval until `shutdown` resolves.
///
/// The first cycle runs immediately. A cycle always completes before the next
/// tick is awaited, so cycles never overlap; ticks missed while a long cycle
/// runs are skipped. On shutdown the status is flushed once more.
///
/// # Errors
///
/// Currently infallible; cycle failures are logged and folded into the status.
pub async fn run_daemon(
    orchestrator: &HealthCheckOrchestrator<'_>,
    interval_secs: u64,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    tracing::info!("Daemon started (interval: {interval_secs}s)");
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = orchestrator.run_cycle().await;
                tracing::info!(
                    "Cycle done: {} target(s), {} unhealthy, {} alert(s), status {}",
                    report.targets_checked,
                    report.unhealthy,
                    report.alerts_count,
                    if report.persisted { "saved" } else { "not saved" }
                );
            }
            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping");
                break;
            }
        }
    }

    orchestrator.flush().await;
    Ok(())
}
