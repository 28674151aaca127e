//! File-backed local cache for native platforms.

use super::{BoxFuture, LocalCache, StorageError, StorageResult};
use crate::document::DrawingRecord;
use std::fs;
use std::path::PathBuf;

/// Local cache persisted as a single JSON file holding the whole record
/// list, mirroring the fixed-key key-value contract.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    /// Create a cache at the given file path, creating parent directories
    /// as needed.
    pub fn new(path: PathBuf) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Io(format!("failed to create cache directory: {e}"))
                })?;
            }
        }
        Ok(Self { path })
    }

    /// Create the cache in the default location:
    /// `<local data dir>/scrawl/drawings.json`.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("could not determine home directory".to_string()))?;
        Self::new(base.join("scrawl").join("drawings.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LocalCache for FileCache {
    fn read_all(&self) -> BoxFuture<'_, StorageResult<Vec<DrawingRecord>>> {
        let path = self.path.clone();
        Box::pin(async move {
            if !path.exists() {
                return Ok(Vec::new());
            }
            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("failed to read {}: {e}", path.display())))?;
            serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!("failed to parse {}: {e}", path.display()))
            })
        })
    }

    fn write_all(&self, records: &[DrawingRecord]) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.path.clone();
        let json = match serde_json::to_string(records) {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };
        Box::pin(async move {
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("failed to write {}: {e}", path.display())))
        })
    }
}
