use crate::application::services::monitor::HealthCheckOrchestrator;
use crate::application::services::reporter::StatusReporter;
use crate::presentation::cli::formatters::alert_fmt::format_alerts;
use crate::presentation::cli::formatters::status_fmt::print_report;

/// Run one cycle and print the resulting status and any alerts it raised.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run_check(
    orchestrator: &HealthCheckOrchestrator<'_>,
    reporter: &StatusReporter,
    json: bool,
) -> anyhow::Result<()> {
    let cycle = orchestrator.run_cycle().await;
    let report = reporter.report().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    if cycle.alerts_count > 0 {
        format_alerts(&reporter.recent_alerts(cycle.alerts_count).await);
    }
    if !cycle.persisted {
        tracing::warn!("Status could not be saved");
    }
    Ok(())
}
