use serde::{Deserialize, Serialize};

/// Severity of an alert, ordered from least to most visible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recovery notices. Channels deliver these without push/audible treatment.
    Good,
    Warning,
    /// A target went down. Channels use their loudest treatment.
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "GOOD"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl Severity {
    #[must_use]
    pub const fn emoji(&self) -> &str {
        match self {
            Self::Good => "\u{1F7E2}",
            Self::Warning => "\u{1F7E1}",
            Self::Critical => "\u{1F534}",
        }
    }

    /// Whether channels should suppress push/audible notification.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::Good)
    }
}
