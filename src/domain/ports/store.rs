use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::status::StatusStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
    #[error("stored status is corrupted: {0}")]
    Corrupted(String),
}

/// Durable storage for the status snapshot. Loading happens once at startup;
/// saving runs every cycle and must not block the runtime.
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Load the last persisted snapshot, or `None` if nothing was persisted yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage cannot be read or decoded.
    fn load(&self) -> Result<Option<StatusStore>, StoreError>;

    /// Replace the persisted snapshot. Readers never observe a partial write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    async fn save(&self, status: &StatusStore) -> Result<(), StoreError>;
}
