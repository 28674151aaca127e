//! Persistence abstraction: the remote blob store and the local cache.

mod coordinator;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
mod remote;

pub use coordinator::{
    AUTOSAVE_DEBOUNCE, LoadOutcome, PersistenceCoordinator, SaveOutcome,
};
pub use memory::{MemoryCache, MemoryRemoteStore};

#[cfg(test)]
pub(crate) use memory::block_on;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileCache;

#[cfg(not(target_arch = "wasm32"))]
pub use remote::HttpRemoteStore;

use crate::document::DrawingRecord;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The remote boundary rejected the payload (empty or oversized).
    #[error("invalid payload: {0}")]
    Validation(String),
    #[error("drawing not found: {0}")]
    NotFound(String),
    /// Transport failure or timeout talking to the remote store.
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    /// A newer request for the same document completed first; the caller
    /// should drop this response.
    #[error("stale response superseded by a newer request")]
    Stale,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The remote blob store, as seen through its wire contract.
///
/// Note: on native platforms implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait RemoteStore: Send + Sync {
    /// Upload a drawing. Returns the canonical id (server-assigned if the
    /// record had none).
    fn save(&self, record: &DrawingRecord) -> BoxFuture<'_, StorageResult<String>>;

    /// Download a drawing by id.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DrawingRecord>>;

    /// Delete a drawing. Deleting an unknown id succeeds.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Liveness probe.
    fn health(&self) -> BoxFuture<'_, StorageResult<()>>;
}

/// The remote blob store (WASM version without Send + Sync bounds).
#[cfg(target_arch = "wasm32")]
pub trait RemoteStore {
    fn save(&self, record: &DrawingRecord) -> BoxFuture<'_, StorageResult<String>>;
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DrawingRecord>>;
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
    fn health(&self) -> BoxFuture<'_, StorageResult<()>>;
}

/// The local cache: one fixed key mapping to the ordered collection of
/// drawing records, read and written wholesale (no partial updates).
#[cfg(not(target_arch = "wasm32"))]
pub trait LocalCache: Send + Sync {
    fn read_all(&self) -> BoxFuture<'_, StorageResult<Vec<DrawingRecord>>>;
    fn write_all(&self, records: &[DrawingRecord]) -> BoxFuture<'_, StorageResult<()>>;
}

/// The local cache (WASM version without Send + Sync bounds).
#[cfg(target_arch = "wasm32")]
pub trait LocalCache {
    fn read_all(&self) -> BoxFuture<'_, StorageResult<Vec<DrawingRecord>>>;
    fn write_all(&self, records: &[DrawingRecord]) -> BoxFuture<'_, StorageResult<()>>;
}
