//! In-memory storage implementations for testing and ephemeral use.

use super::{BoxFuture, LocalCache, RemoteStore, StorageError, StorageResult};
use crate::document::DrawingRecord;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory remote store with a switchable offline mode to simulate
/// network failure.
#[derive(Default)]
pub struct MemoryRemoteStore {
    drawings: RwLock<HashMap<String, DrawingRecord>>,
    offline: AtomicBool,
}

impl MemoryRemoteStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the remote endpoint being unreachable. While offline every
    /// operation fails with [`StorageError::Network`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Relaxed)
    }

    fn check_online(&self) -> StorageResult<()> {
        if self.is_offline() {
            Err(StorageError::Network("remote store unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    /// Number of stored drawings (test helper).
    pub fn len(&self) -> usize {
        self.drawings.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn save(&self, record: &DrawingRecord) -> BoxFuture<'_, StorageResult<String>> {
        let mut record = record.clone();
        Box::pin(async move {
            self.check_online()?;
            let id = record
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            record.id = Some(id.clone());
            let mut drawings = self
                .drawings
                .write()
                .map_err(|e| StorageError::Io(format!("lock error: {e}")))?;
            drawings.insert(id.clone(), record);
            Ok(id)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DrawingRecord>> {
        let id = id.to_string();
        Box::pin(async move {
            self.check_online()?;
            let drawings = self
                .drawings
                .read()
                .map_err(|e| StorageError::Io(format!("lock error: {e}")))?;
            drawings
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.check_online()?;
            let mut drawings = self
                .drawings
                .write()
                .map_err(|e| StorageError::Io(format!("lock error: {e}")))?;
            // Deleting an unknown id succeeds, per the wire contract.
            drawings.remove(&id);
            Ok(())
        })
    }

    fn health(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move { self.check_online() })
    }
}

/// In-memory local cache: the record list behind a lock.
#[derive(Default)]
pub struct MemoryCache {
    records: RwLock<Vec<DrawingRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn read_all(&self) -> BoxFuture<'_, StorageResult<Vec<DrawingRecord>>> {
        Box::pin(async move {
            let records = self
                .records
                .read()
                .map_err(|e| StorageError::Io(format!("lock error: {e}")))?;
            Ok(records.clone())
        })
    }

    fn write_all(&self, records: &[DrawingRecord]) -> BoxFuture<'_, StorageResult<()>> {
        let records = records.to_vec();
        Box::pin(async move {
            let mut slot = self
                .records
                .write()
                .map_err(|e| StorageError::Io(format!("lock error: {e}")))?;
            *slot = records;
            Ok(())
        })
    }
}

/// Blocking executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
