use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use chainwatch::application::config::AppConfig;
use chainwatch::application::services::dispatcher::NotificationDispatcher;
use chainwatch::application::services::load_status;
use chainwatch::application::services::monitor::{HealthCheckOrchestrator, ProbeSet};
use chainwatch::application::services::reporter::StatusReporter;
use chainwatch::domain::ports::probe::{ConsoleProbe, SupervisorProbe};
use chainwatch::infrastructure::notifications::{create_channels, http_client};
use chainwatch::infrastructure::persistence::json_file::JsonFileRepository;
use chainwatch::infrastructure::probes::{HttpRpcProbe, Pm2Probe, TmuxProbe, WebSocketProbe};
use chainwatch::presentation::bot::run_bot;
use chainwatch::presentation::cli::app::{Cli, Commands};
use chainwatch::presentation::cli::commands::alerts::run_alerts;
use chainwatch::presentation::cli::commands::bot::bot_client;
use chainwatch::presentation::cli::commands::check::run_check;
use chainwatch::presentation::cli::commands::daemon::{run_daemon, shutdown_signal};
use chainwatch::presentation::cli::commands::notify_test::run_notify_test;
use chainwatch::presentation::cli::commands::status::run_status;
use chainwatch::presentation::dashboard::{DashboardServer, DashboardState};

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  CHAINWATCH: Node Health Monitor".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

/// Console logging plus an optional plain-text log file, which also feeds the
/// dashboard's log endpoint. `RUST_LOG` overrides the default level.
fn setup_tracing(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let console_layer = tracing_subscriber::fmt::layer().with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .context("log_file must name a file")?;
            std::fs::create_dir_all(dir).context("Failed to create log directory")?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        let mut config = AppConfig::load_from(path)?;
        config.apply_env();
        config
    } else {
        AppConfig::load()?
    };

    let _log_guard = setup_tracing(cli.verbose, config.log_path().as_deref())?;

    // Manual DI: main.rs is the only place that knows concrete types
    let repository = JsonFileRepository::new(config.status_path());
    let status = load_status(&repository);
    let reporter = StatusReporter::new(Arc::clone(&status));

    let probe_timeout = Duration::from_secs(config.general.probe_timeout_secs);
    let channel_timeout = Duration::from_secs(config.general.channel_timeout_secs);
    let client = http_client(channel_timeout)?;
    let dispatcher = NotificationDispatcher::new(
        create_channels(&config.notifications, &client),
        channel_timeout,
    );

    let tmux = TmuxProbe::new(config.console.binary.clone(), config.console.tail_lines);
    let pm2 = Pm2Probe::new(config.supervisor.binary.clone());
    let http = HttpRpcProbe::new(probe_timeout)?;
    let websocket = WebSocketProbe::new(probe_timeout);
    let probes = ProbeSet {
        console: config
            .console
            .enabled
            .then_some(&tmux as &dyn ConsoleProbe),
        http: &http,
        websocket: &websocket,
        supervisor: config
            .supervisor
            .enabled
            .then_some(&pm2 as &dyn SupervisorProbe),
    };
    let classifier = config.classifier();
    let orchestrator = HealthCheckOrchestrator::new(
        probes,
        &dispatcher,
        &repository,
        &classifier,
        &config.endpoints,
        status,
    )
    .with_expected_sessions(&config.console.expected_sessions)
    .with_probe_timeout(probe_timeout);

    match cli.command {
        Some(Commands::Status { json }) => run_status(&reporter, json).await?,
        Some(Commands::Alerts { limit, json }) => run_alerts(&reporter, limit, json).await?,
        Some(Commands::Check { json }) => run_check(&orchestrator, &reporter, json).await?,
        Some(Commands::NotifyTest) => run_notify_test(&dispatcher).await?,
        command @ (Some(Commands::Daemon { .. } | Commands::Bot) | None) => {
            let interval_secs = match command {
                Some(Commands::Daemon {
                    interval: Some(secs),
                }) => secs,
                _ => config.general.interval_secs,
            };

            let bot = if command == Some(Commands::Bot) {
                let telegram = bot_client(&config.notifications.telegram, client.clone())?;
                Some(tokio::spawn(run_bot(
                    telegram,
                    reporter.clone(),
                    shutdown_signal(),
                )))
            } else {
                None
            };

            let dashboard = if config.dashboard.enabled {
                let addr: SocketAddr = format!("{}:{}", config.dashboard.bind, config.dashboard.port)
                    .parse()
                    .context("Invalid dashboard bind address")?;
                let state = Arc::new(DashboardState {
                    reporter: reporter.clone(),
                    log_file: config.log_path(),
                });
                Some(tokio::spawn(
                    DashboardServer::new(state, addr).run(shutdown_signal()),
                ))
            } else {
                None
            };

            print_banner();
            tracing::info!(
                "Channels: {}",
                match dispatcher.channel_names() {
                    names if names.is_empty() => "none".to_string(),
                    names => names.join(", "),
                }
            );
            run_daemon(&orchestrator, interval_secs, shutdown_signal()).await?;

            if let Some(handle) = bot {
                if let Err(e) = handle.await {
                    tracing::warn!("Bot task failed: {e}");
                }
            }
            if let Some(handle) = dashboard {
                match handle.await {
                    Ok(Err(e)) => tracing::warn!("Dashboard stopped with error: {e}"),
                    Err(e) => tracing::warn!("Dashboard task failed: {e}"),
                    Ok(Ok(())) => {}
                }
            }
            println!("\nStopping chainwatch...");
        }
    }

    Ok(())
}
