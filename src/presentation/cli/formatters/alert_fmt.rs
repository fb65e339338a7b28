use colored::Colorize;

use crate::domain::entities::alert::Alert;
use crate::domain::value_objects::severity::Severity;

/// Strips ANSI/OSC escape sequences from a string to prevent terminal injection.
fn sanitize_terminal(input: &str) -> String {
    input.chars().filter(|c| *c != '\x1b').collect()
}

fn severity_badge(severity: Severity) -> String {
    let label = format!(" {severity} ");
    match severity {
        Severity::Critical => format!("{}", label.on_red().white().bold()),
        Severity::Warning => format!("{}", label.on_yellow().black().bold()),
        Severity::Good => format!("{}", label.on_green().black()),
    }
}

#[must_use]
pub fn format_alert(alert: &Alert) -> String {
    let mut out = format!(
        "{} {} {}  {}",
        severity_badge(alert.severity),
        alert.severity.emoji(),
        sanitize_terminal(&alert.title).bold(),
        alert
            .timestamp
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    for line in alert.message.lines().filter(|l| !l.is_empty()) {
        out.push_str(&format!("\n  {}", sanitize_terminal(line).dimmed()));
    }
    out
}

pub fn format_alerts(alerts: &[Alert]) {
    for alert in alerts {
        println!();
        println!("{}", format_alert(alert));
    }
    println!();
}

pub fn print_no_alerts() {
    println!();
    println!("{}", "No alerts recorded".green().bold());
    println!();
}
