use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::entities::status::StatusStore;
use crate::domain::ports::store::{StatusRepository, StoreError};

/// In-memory repository for testing purposes.
pub struct InMemoryRepository {
    saved: Mutex<Option<StatusStore>>,
    saves: Mutex<usize>,
    fail_writes: bool,
}

impl InMemoryRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            saved: Mutex::new(None),
            saves: Mutex::new(0),
            fail_writes: false,
        }
    }

    /// Repository whose writes always fail.
    #[must_use]
    pub const fn failing() -> Self {
        Self {
            saved: Mutex::new(None),
            saves: Mutex::new(0),
            fail_writes: true,
        }
    }

    #[must_use]
    pub fn with_status(status: StatusStore) -> Self {
        Self {
            saved: Mutex::new(Some(status)),
            saves: Mutex::new(0),
            fail_writes: false,
        }
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn saved_count(&self) -> usize {
        self.saves.lock().map_or(0, |n| *n)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusRepository for InMemoryRepository {
    fn load(&self) -> Result<Option<StatusStore>, StoreError> {
        Ok(self
            .saved
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .clone())
    }

    async fn save(&self, status: &StatusStore) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed("simulated failure".into()));
        }
        *self
            .saved
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))? = Some(status.clone());
        *self
            .saves
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))? += 1;
        Ok(())
    }
}
