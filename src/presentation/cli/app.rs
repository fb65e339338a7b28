use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chainwatch: health monitor for blockchain node infrastructure
///
/// Watches validator and RPC node consoles, RPC endpoints and supervised
/// services, and notifies when any of them goes down or recovers.
#[derive(Parser, Debug)]
#[command(name = "chainwatch")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run health checks continuously (default)
    #[command(alias = "d")]
    Daemon {
        /// Check interval override in seconds
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Run a single check cycle and print the result
    #[command(alias = "c")]
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the last persisted status without probing
    #[command(alias = "s")]
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent alerts
    #[command(alias = "a")]
    Alerts {
        /// Number of alerts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the daemon together with the Telegram command bot
    Bot,

    /// Send a test notification to every enabled channel
    NotifyTest,
}
