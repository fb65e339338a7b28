use crate::domain::entities::health::{ProbeDetail, ProbeOutcome};

/// Substrings (lowercase) that mark a console tail as unhealthy.
pub const FAILURE_KEYWORDS: &[&str] = &["error", "fatal", "panic", "connection refused"];

/// Judge a console tail: healthy iff none of [`FAILURE_KEYWORDS`] appear,
/// case-insensitively.
#[must_use]
pub fn assess_console_output(output: &str) -> ProbeOutcome {
    let lower = output.to_lowercase();
    let hit = FAILURE_KEYWORDS.iter().find(|kw| lower.contains(*kw));

    ProbeOutcome {
        healthy: hit.is_none(),
        detail: ProbeDetail {
            error: hit.map(|kw| format!("console output contains \"{kw}\"")),
            output: Some(output.trim().to_string()),
            ..ProbeDetail::default()
        },
    }
}
