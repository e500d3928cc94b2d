use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};

/// Key-value persistence of whole collections.
///
/// All implementations must satisfy these invariants:
/// - `write_raw` replaces the entire collection; no partially written state
///   is ever observable by a later `read_raw`.
/// - `read_raw` returns `Ok(None)` for a collection that was never written.
/// - The store never interprets the JSON it holds.
pub trait CollectionStore: Send + Sync {
    /// Read the serialized collection, if one has been written.
    fn read_raw(&self, collection: Collection) -> StoreResult<Option<String>>;

    /// Replace the serialized collection.
    fn write_raw(&self, collection: Collection, json: &str) -> StoreResult<()>;

    /// Clear every collection to an empty sequence. Idempotent.
    fn reset(&self) -> StoreResult<()> {
        for collection in Collection::ALL {
            self.write_raw(collection, "[]")?;
        }
        Ok(())
    }
}

impl<S: CollectionStore + ?Sized> CollectionStore for Box<S> {
    fn read_raw(&self, collection: Collection) -> StoreResult<Option<String>> {
        (**self).read_raw(collection)
    }

    fn write_raw(&self, collection: Collection, json: &str) -> StoreResult<()> {
        (**self).write_raw(collection, json)
    }

    fn reset(&self) -> StoreResult<()> {
        (**self).reset()
    }
}

impl<S: CollectionStore + ?Sized> CollectionStore for Arc<S> {
    fn read_raw(&self, collection: Collection) -> StoreResult<Option<String>> {
        (**self).read_raw(collection)
    }

    fn write_raw(&self, collection: Collection, json: &str) -> StoreResult<()> {
        (**self).write_raw(collection, json)
    }

    fn reset(&self) -> StoreResult<()> {
        (**self).reset()
    }
}

/// Typed access on top of any [`CollectionStore`].
pub trait CollectionStoreExt: CollectionStore {
    /// Read a collection as records.
    ///
    /// Missing, unreadable, or malformed data reads as an empty sequence.
    /// Failures are logged rather than returned.
    fn read<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let raw = match self.read_raw(collection) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(%collection, error = %e, "collection unreadable; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(%collection, error = %e, "malformed collection; treating as empty");
                Vec::new()
            }
        }
    }

    /// Serialize and replace a collection.
    fn write<T: Serialize>(&self, collection: Collection, records: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.write_raw(collection, &json)?;
        tracing::debug!(%collection, count = records.len(), "collection written");
        Ok(())
    }
}

impl<S: CollectionStore + ?Sized> CollectionStoreExt for S {}
