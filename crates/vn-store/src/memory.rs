use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};
use crate::traits::CollectionStore;

/// In-memory, HashMap-based collection store.
///
/// Intended for tests and embedding. Each collection is held as its
/// serialized JSON behind a `RwLock`, so the typed read path (including
/// malformed-data handling) is the same as for durable backends. Data is
/// lost when the store is dropped.
pub struct InMemoryCollectionStore {
    collections: RwLock<HashMap<Collection, String>>,
    read_only: AtomicBool,
}

impl InMemoryCollectionStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            read_only: AtomicBool::new(false),
        }
    }

    /// Reject (or re-allow) all subsequent writes with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Returns `true` if writes are currently rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    /// Number of collections that have been written at least once.
    pub fn len(&self) -> usize {
        self.collections.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if no collection has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionStore for InMemoryCollectionStore {
    fn read_raw(&self, collection: Collection) -> StoreResult<Option<String>> {
        let map = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(&collection).cloned())
    }

    fn write_raw(&self, collection: Collection, json: &str) -> StoreResult<()> {
        if self.is_read_only() {
            return Err(StoreError::ReadOnly);
        }
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        map.insert(collection, json.to_string());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryCollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCollectionStore")
            .field("collection_count", &self.len())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}
