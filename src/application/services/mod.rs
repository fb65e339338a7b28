pub mod dispatcher;
pub mod monitor;
pub mod reporter;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entities::status::StatusStore;
use crate::domain::ports::store::StatusRepository;

pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use monitor::{CycleReport, HealthCheckOrchestrator, ProbeSet};
pub use reporter::StatusReporter;

/// Process-wide status. Written only by the orchestrator at the end of a
/// cycle; everything else takes read locks.
pub type SharedStatus = Arc<RwLock<StatusStore>>;

/// Load the persisted snapshot, falling back to an empty store when nothing
/// was saved yet or the file cannot be decoded.
pub fn load_status(repository: &dyn StatusRepository) -> SharedStatus {
    let store = match repository.load() {
        Ok(Some(store)) => {
            tracing::info!(
                "Loaded status with {} target(s) and {} alert(s)",
                store.target_count(),
                store.alerts.len()
            );
            store
        }
        Ok(None) => StatusStore::new(),
        Err(e) => {
            tracing::warn!("Ignoring persisted status: {e}");
            StatusStore::new()
        }
    };
    Arc::new(RwLock::new(store))
}
