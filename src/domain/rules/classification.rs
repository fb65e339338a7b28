use crate::domain::value_objects::category::TargetCategory;

/// Decides whether a console session is a validator or an RPC node.
///
/// Explicit name lists take precedence. Otherwise `<prefix><ordinal>` with an
/// ordinal up to `validator_max_ordinal` is a validator, anything else an RPC
/// node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetClassifier {
    session_prefix: String,
    validator_max_ordinal: u32,
    validators: Vec<String>,
    rpc_nodes: Vec<String>,
}

impl TargetClassifier {
    #[must_use]
    pub fn new(
        session_prefix: impl Into<String>,
        validator_max_ordinal: u32,
        validators: Vec<String>,
        rpc_nodes: Vec<String>,
    ) -> Self {
        Self {
            session_prefix: session_prefix.into(),
            validator_max_ordinal,
            validators,
            rpc_nodes,
        }
    }

    /// Whether a live session belongs to the monitored set at all.
    #[must_use]
    pub fn is_tracked(&self, session: &str) -> bool {
        session.starts_with(&self.session_prefix)
            || self.validators.iter().any(|v| v == session)
            || self.rpc_nodes.iter().any(|r| r == session)
    }

    #[must_use]
    pub fn classify(&self, session: &str) -> TargetCategory {
        if self.validators.iter().any(|v| v == session) {
            return TargetCategory::Validator;
        }
        if self.rpc_nodes.iter().any(|r| r == session) {
            return TargetCategory::RpcNode;
        }
        match self.ordinal(session) {
            Some(n) if n <= self.validator_max_ordinal => TargetCategory::Validator,
            _ => TargetCategory::RpcNode,
        }
    }

    fn ordinal(&self, session: &str) -> Option<u32> {
        session
            .strip_prefix(&self.session_prefix)
            .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
    }
}

impl Default for TargetClassifier {
    fn default() -> Self {
        Self::new("node", 10, Vec::new(), Vec::new())
    }
}
