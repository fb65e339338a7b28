use crate::application::services::reporter::StatusReporter;
use crate::presentation::cli::formatters::status_fmt::print_report;

/// Print the last persisted status without running any probe.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run_status(reporter: &StatusReporter, json: bool) -> anyhow::Result<()> {
    let report = reporter.report().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
