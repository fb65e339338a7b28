use colored::{ColoredString, Colorize};

use crate::domain::entities::health::HealthResult;
use crate::domain::entities::report::StatusReport;

#[must_use]
pub fn health_mark(healthy: bool) -> ColoredString {
    if healthy { "✔".green().bold() } else { "✖".red().bold() }
}

/// `healthy/total`, green when everything is up, red when nothing is.
#[must_use]
pub fn colorize_ratio(healthy: usize, total: usize) -> ColoredString {
    let text = format!("{healthy}/{total}");
    if healthy == total {
        text.green()
    } else if healthy == 0 {
        text.red().bold()
    } else {
        text.yellow()
    }
}

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "─".repeat(display_width).cyan());
}

/// One line per target: mark, name, then block/latency or the error.
#[must_use]
pub fn format_result_line(result: &HealthResult) -> String {
    let mut line = format!("  {} {:<24}", health_mark(result.healthy), result.target);
    if let Some(info) = &result.detail.service {
        let pid = info.pid.map_or_else(|| "-".to_string(), |p| p.to_string());
        line.push_str(&format!(
            " {:<10} pid {:<8} {:>5} MB {:>5.1}% cpu  {} restarts",
            info.status,
            pid,
            info.memory_mb(),
            info.cpu_percent,
            info.restart_count
        ));
        return line;
    }
    if result.healthy {
        if let Some(block) = &result.detail.block_number {
            line.push_str(&format!(" block {block}"));
        }
        if let Some(ms) = result.detail.latency_ms {
            line.push_str(&format!(" {}", format!("{ms}ms").dimmed()));
        }
    } else if let Some(err) = result.error() {
        line.push_str(&format!(" {}", err.red()));
    }
    line
}

pub fn print_report(report: &StatusReport) {
    let s = &report.summary;
    let details = &report.details;

    println!("{}", "chainwatch: Network Status".bold().cyan());
    println!("{}", "━".repeat(50));
    println!(
        "  Validators {}   RPC nodes {}   Services {}",
        colorize_ratio(s.healthy_validators, s.total_validators),
        colorize_ratio(s.healthy_rpc_nodes, s.total_rpc_nodes),
        colorize_ratio(s.online_services, s.total_services),
    );
    let last_check = details.last_check.map_or_else(
        || "never".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    println!("  Last check: {}", last_check.dimmed());

    for (title, results) in [
        ("\nValidators", &details.validators),
        ("\nRPC Nodes", &details.rpc_nodes),
        ("\nServices", &details.services),
    ] {
        if results.is_empty() {
            continue;
        }
        print_section_header(title);
        for result in results.values() {
            println!("{}", format_result_line(result));
        }
    }
    println!();
}
