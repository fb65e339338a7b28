use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::domain::entities::status::StatusStore;
use crate::domain::ports::store::{StatusRepository, StoreError};

/// Status snapshot stored as a pretty-printed JSON document.
///
/// Each save writes a temp file next to the target and renames it over the
/// previous snapshot, so readers see either the old or the new file.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

}

/// Write `bytes` to a temp file beside `path`, fsync it and rename it over
/// `path`. Blocking.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| StoreError::WriteFailed(e.error.to_string()))?;
    Ok(())
}

#[async_trait]
impl StatusRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<StatusStore>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::ReadFailed(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Corrupted(format!("{}: {e}", self.path.display())))
    }

    async fn save(&self, status: &StatusStore) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(status)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        // file I/O and fsync run on the blocking pool, off the runtime workers
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &json))
            .await
            .map_err(|e| StoreError::WriteFailed(format!("write task failed: {e}")))?
    }
}
