use serde::{Deserialize, Serialize};

/// Class of a monitored target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TargetCategory {
    Validator,
    RpcNode,
    Service,
}

impl TargetCategory {
    /// Short label used in alert titles.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Validator => "VALIDATOR",
            Self::RpcNode => "RPC",
            Self::Service => "SERVICE",
        }
    }
}

impl std::fmt::Display for TargetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validator => write!(f, "validator"),
            Self::RpcNode => write!(f, "rpc-node"),
            Self::Service => write!(f, "service"),
        }
    }
}
