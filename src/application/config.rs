use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::rules::classification::TargetClassifier;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub supervisor: SupervisorConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointConfig>,
}

/// Scheduling, timeouts and file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_channel_timeout")]
    pub channel_timeout_secs: u64,
    #[serde(default = "default_status_file")]
    pub status_file: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

/// How console sessions are split into validators and RPC nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    #[serde(default = "default_session_prefix")]
    pub session_prefix: String,
    #[serde(default = "default_validator_max_ordinal")]
    pub validator_max_ordinal: u32,
    #[serde(default)]
    pub validators: Vec<String>,
    #[serde(default)]
    pub rpc_nodes: Vec<String>,
}

/// Terminal multiplexer probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_tmux_binary")]
    pub binary: String,
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
    /// Sessions that must exist; a missing one is reported unhealthy.
    #[serde(default)]
    pub expected_sessions: Vec<String>,
}

/// Process supervisor probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_pm2_binary")]
    pub binary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Http,
    #[serde(alias = "ws")]
    WebSocket,
}

/// A statically configured RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: EndpointKind,
}

/// Notification channels: email, webhook, slack, telegram.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// Email delivered through an HTTP mail relay API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default = "default_telegram_api")]
    pub api_base: String,
}

/// Read-only HTTP status API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

// --- Defaults ---

const fn default_interval() -> u64 {
    30
}

const fn default_probe_timeout() -> u64 {
    10
}

const fn default_channel_timeout() -> u64 {
    5
}

// NOTE: Stored as raw string with tilde; expanded in `status_path()`.
fn default_status_file() -> String {
    "~/.local/share/chainwatch/status.json".into()
}

fn default_session_prefix() -> String {
    "node".into()
}

const fn default_validator_max_ordinal() -> u32 {
    10
}

const fn default_true() -> bool {
    true
}

fn default_tmux_binary() -> String {
    "tmux".into()
}

const fn default_tail_lines() -> usize {
    10
}

fn default_pm2_binary() -> String {
    "pm2".into()
}

fn default_endpoints() -> Vec<EndpointConfig> {
    vec![
        EndpointConfig {
            name: "Local RPC".into(),
            url: "http://localhost:80".into(),
            kind: EndpointKind::Http,
        },
        EndpointConfig {
            name: "Local WebSocket".into(),
            url: "ws://localhost:8545".into(),
            kind: EndpointKind::WebSocket,
        },
    ]
}

fn default_telegram_api() -> String {
    "https://api.telegram.org".into()
}

fn default_bind() -> String {
    "0.0.0.0".into()
}

const fn default_dashboard_port() -> u16 {
    3001
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            probe_timeout_secs: default_probe_timeout(),
            channel_timeout_secs: default_channel_timeout(),
            status_file: default_status_file(),
            log_file: None,
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            session_prefix: default_session_prefix(),
            validator_max_ordinal: default_validator_max_ordinal(),
            validators: Vec::new(),
            rpc_nodes: Vec::new(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            binary: default_tmux_binary(),
            tail_lines: default_tail_lines(),
            expected_sessions: Vec::new(),
        }
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            binary: default_pm2_binary(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: None,
            chat_id: None,
            api_base: default_telegram_api(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind: default_bind(),
            port: default_dashboard_port(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from the default path (creating it if missing), then apply
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_or_create(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("chainwatch").join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Flags are enabled only by the
    /// literal `true`; unset variables leave the file value untouched.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let flag = |key: &str| lookup(key).map(|v| v == "true");

        let n = &mut self.notifications;
        if let Some(on) = flag("EMAIL_NOTIFICATIONS") {
            n.email.enabled = on;
        }
        override_opt(&mut n.email.api_url, lookup("EMAIL_API_URL"));
        override_opt(&mut n.email.api_key, lookup("EMAIL_API_KEY"));
        override_opt(&mut n.email.from, lookup("EMAIL_FROM"));
        override_opt(&mut n.email.to, lookup("EMAIL_TO"));

        if let Some(on) = flag("WEBHOOK_NOTIFICATIONS") {
            n.webhook.enabled = on;
        }
        override_opt(&mut n.webhook.url, lookup("WEBHOOK_URL"));

        if let Some(on) = flag("SLACK_NOTIFICATIONS") {
            n.slack.enabled = on;
        }
        override_opt(&mut n.slack.webhook_url, lookup("SLACK_WEBHOOK_URL"));

        if let Some(on) = flag("TELEGRAM_NOTIFICATIONS") {
            n.telegram.enabled = on;
        }
        override_opt(&mut n.telegram.bot_token, lookup("TELEGRAM_BOT_TOKEN"));
        override_opt(&mut n.telegram.chat_id, lookup("TELEGRAM_CHAT_ID"));

        if let Some(port) = lookup("DASHBOARD_PORT").and_then(|p| p.parse().ok()) {
            self.dashboard.port = port;
        }
        if let Some(path) = lookup("CHAINWATCH_STATUS_FILE") {
            self.general.status_file = path;
        }
    }

    #[must_use]
    pub fn status_path(&self) -> PathBuf {
        expand(&self.general.status_file)
    }

    #[must_use]
    pub fn log_path(&self) -> Option<PathBuf> {
        self.general.log_file.as_deref().map(expand)
    }

    #[must_use]
    pub fn classifier(&self) -> TargetClassifier {
        let c = &self.classification;
        TargetClassifier::new(
            c.session_prefix.clone(),
            c.validator_max_ordinal,
            c.validators.clone(),
            c.rpc_nodes.clone(),
        )
    }
}

fn override_opt(slot: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        *slot = Some(v);
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
