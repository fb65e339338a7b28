use serde::{Deserialize, Serialize};

use crate::domain::entities::health::HealthResult;
use crate::domain::value_objects::severity::Severity;

/// Edge between two consecutive observations of the same target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    None,
    Degraded,
    Recovered,
}

impl Transition {
    /// Classify `current` against the previously stored result.
    ///
    /// A first observation (`previous` absent) is never a transition.
    #[must_use]
    pub fn classify(previous: Option<&HealthResult>, current: &HealthResult) -> Self {
        match previous {
            Some(prev) if prev.healthy && !current.healthy => Self::Degraded,
            Some(prev) if !prev.healthy && current.healthy => Self::Recovered,
            _ => Self::None,
        }
    }

    /// Severity of the alert raised for this transition, if any.
    #[must_use]
    pub const fn severity(&self) -> Option<Severity> {
        match self {
            Self::None => None,
            Self::Degraded => Some(Severity::Critical),
            Self::Recovered => Some(Severity::Good),
        }
    }
}
