use crate::application::services::reporter::StatusReporter;
use crate::presentation::cli::formatters::alert_fmt::{format_alerts, print_no_alerts};

/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run_alerts(reporter: &StatusReporter, limit: usize, json: bool) -> anyhow::Result<()> {
    let alerts = reporter.recent_alerts(limit).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
    } else if alerts.is_empty() {
        print_no_alerts();
    } else {
        format_alerts(&alerts);
    }
    Ok(())
}
