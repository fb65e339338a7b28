use async_trait::async_trait;

use super::run_command;
use crate::domain::entities::health::ProbeOutcome;
use crate::domain::ports::probe::{ConsoleProbe, ProbeError};
use crate::domain::rules::console::assess_console_output;

/// Reads node consoles from tmux sessions.
pub struct TmuxProbe {
    binary: String,
    tail_lines: usize,
}

impl TmuxProbe {
    #[must_use]
    pub fn new(binary: impl Into<String>, tail_lines: usize) -> Self {
        Self {
            binary: binary.into(),
            tail_lines,
        }
    }
}

impl Default for TmuxProbe {
    fn default() -> Self {
        Self::new("tmux", 10)
    }
}

#[async_trait]
impl ConsoleProbe for TmuxProbe {
    async fn list_live_targets(&self) -> Result<Vec<String>, ProbeError> {
        match run_command(&self.binary, &["list-sessions", "-F", "#{session_name}"]).await {
            Ok(stdout) => Ok(parse_session_list(&stdout)),
            // tmux exits non-zero when no server is running, i.e. no sessions
            Err(ProbeError::CommandFailed(msg))
                if msg.contains("no server running") || msg.contains("error connecting") =>
            {
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn probe(&self, name: &str) -> Result<ProbeOutcome, ProbeError> {
        let target = exact_target(name);
        let pane = run_command(&self.binary, &["capture-pane", "-t", &target, "-p"]).await?;
        Ok(assess_console_output(&tail(&pane, self.tail_lines)))
    }
}

/// `=name:` makes tmux match the session name exactly; a bare name would also
/// resolve to any session it prefixes (`node2` to `node20`).
fn exact_target(name: &str) -> String {
    format!("={name}:")
}

fn parse_session_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Last `n` non-blank lines of a captured pane.
fn tail(pane: &str, n: usize) -> String {
    let lines: Vec<&str> = pane.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
