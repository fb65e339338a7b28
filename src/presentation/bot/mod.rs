//! Telegram chat bot answering status queries.

use std::fmt::Write;
use std::future::Future;
use std::time::Duration;

use crate::application::services::reporter::StatusReporter;
use crate::domain::entities::alert::Alert;
use crate::domain::entities::health::HealthResult;
use crate::domain::entities::report::StatusReport;
use crate::infrastructure::notifications::telegram::{TelegramClient, Update, truncate_message};

const POLL_SECS: u64 = 30;
const RETRY_DELAY: Duration = Duration::from_secs(5);
const BOT_ALERTS: usize = 5;
const ALERT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Status,
    Alerts,
    Nodes,
    Services,
    Unknown,
}

impl BotCommand {
    /// Parse a chat message. Returns `None` for plain text that is not a command.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let command = word.strip_prefix('/')?;
        // commands in groups arrive as `/status@botname`
        let command = command.split('@').next().unwrap_or(command);
        Some(match command.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "status" => Self::Status,
            "alerts" => Self::Alerts,
            "nodes" => Self::Nodes,
            "services" => Self::Services,
            _ => Self::Unknown,
        })
    }
}

const HELP: &str = "*chainwatch commands*\n\n\
/status - network summary\n\
/alerts - last 5 alerts\n\
/nodes - validator and RPC node health\n\
/services - supervised services\n\
/help - this message";

/// Render the reply for a command.
pub async fn respond(command: BotCommand, reporter: &StatusReporter) -> String {
    let text = match command {
        BotCommand::Start => format!("\u{1F44B} Monitoring bot ready.\n\n{HELP}"),
        BotCommand::Help => HELP.to_string(),
        BotCommand::Status => render_status(&reporter.report().await),
        BotCommand::Alerts => render_alerts(&reporter.recent_alerts(BOT_ALERTS).await),
        BotCommand::Nodes => render_nodes(&reporter.report().await),
        BotCommand::Services => render_services(&reporter.report().await),
        BotCommand::Unknown => "Unknown command. Send /help for the list of commands.".to_string(),
    };
    truncate_message(text)
}

fn render_status(report: &StatusReport) -> String {
    let s = &report.summary;
    let overall = if s.all_healthy() {
        "\u{2705} All systems operational"
    } else {
        "\u{26A0}\u{FE0F} Degraded"
    };
    let last_check = report.details.last_check.map_or_else(
        || "never".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    format!(
        "\u{1F4CA} *Network Status*\n{overall}\n\n\
         Validators: {}/{} healthy\n\
         RPC Nodes: {}/{} healthy\n\
         Services: {}/{} online\n\n\
         _Last check: {last_check}_",
        s.healthy_validators,
        s.total_validators,
        s.healthy_rpc_nodes,
        s.total_rpc_nodes,
        s.online_services,
        s.total_services,
    )
}

fn render_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No alerts recorded.".to_string();
    }
    let mut text = String::from("\u{1F514} *Recent Alerts*\n");
    for alert in alerts {
        let preview = preview(&alert.message, ALERT_PREVIEW_CHARS);
        let _ = write!(
            text,
            "\n{} *{}*\n{preview}\n_{}_\n",
            alert.severity.emoji(),
            alert.title,
            alert.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
    text
}

fn render_nodes(report: &StatusReport) -> String {
    let mut text = String::new();
    section(&mut text, "\u{1F5A5} *Validators*", report.details.validators.values());
    text.push('\n');
    section(&mut text, "\u{1F310} *RPC Nodes*", report.details.rpc_nodes.values());
    text
}

fn section<'a>(text: &mut String, heading: &str, results: impl Iterator<Item = &'a HealthResult>) {
    text.push_str(heading);
    text.push('\n');
    let mut any = false;
    for r in results {
        any = true;
        let mark = if r.healthy { "\u{2705}" } else { "\u{274C}" };
        let _ = write!(text, "{mark} {}", r.target);
        if let Some(block) = &r.detail.block_number {
            let _ = write!(text, " (block {block})");
        }
        if let Some(err) = r.error().filter(|_| !r.healthy) {
            let _ = write!(text, " - {}", preview(err, ALERT_PREVIEW_CHARS));
        }
        text.push('\n');
    }
    if !any {
        text.push_str("_none_\n");
    }
}

fn render_services(report: &StatusReport) -> String {
    let services = &report.details.services;
    if services.is_empty() {
        return "\u{2699}\u{FE0F} *Services*\n_none_".to_string();
    }
    let mut text = String::from("\u{2699}\u{FE0F} *Services*\n");
    for r in services.values() {
        let mark = if r.healthy { "\u{2705}" } else { "\u{274C}" };
        match &r.detail.service {
            Some(info) => {
                let pid = info.pid.map_or_else(|| "-".to_string(), |p| p.to_string());
                let _ = writeln!(
                    text,
                    "{mark} {} - {} (PID {pid}, {} MB, {:.1}% CPU, {} restarts)",
                    info.name,
                    info.status,
                    info.memory_mb(),
                    info.cpu_percent,
                    info.restart_count
                );
            }
            None => {
                let _ = writeln!(text, "{mark} {}", r.target);
            }
        }
    }
    text
}

fn preview(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max).collect();
    cut.push_str("...");
    cut
}

/// Long-poll Telegram for commands until `shutdown` resolves.
pub async fn run_bot(
    client: TelegramClient,
    reporter: StatusReporter,
    shutdown: impl Future<Output = ()>,
) {
    tracing::info!("Telegram bot polling started");
    tokio::pin!(shutdown);
    let mut offset = None;

    loop {
        let updates = tokio::select! {
            () = &mut shutdown => break,
            updates = client.get_updates(offset, POLL_SECS) => updates,
        };

        match updates {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    handle_update(&client, &reporter, update).await;
                }
            }
            Err(e) => {
                tracing::warn!("Telegram polling failed: {e}");
                tokio::select! {
                    () = &mut shutdown => break,
                    () = tokio::time::sleep(RETRY_DELAY) => {}
                }
            }
        }
    }
    tracing::info!("Telegram bot stopped");
}

async fn handle_update(client: &TelegramClient, reporter: &StatusReporter, update: Update) {
    let Some(message) = update.message else {
        return;
    };
    let Some(command) = message.text.as_deref().and_then(BotCommand::parse) else {
        return;
    };
    let chat_id = message.chat.id.to_string();
    tracing::debug!(chat_id = %chat_id, ?command, "Bot command");

    let reply = respond(command, reporter).await;
    if let Err(e) = client.send_message(&chat_id, &reply, false).await {
        tracing::warn!(chat_id = %chat_id, "Bot reply failed: {e}");
    }
}
