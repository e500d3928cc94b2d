use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::file::FileCollectionStore;
use crate::memory::InMemoryCollectionStore;
use crate::traits::CollectionStore;

/// Which persistence backend to construct.
///
/// Deserializes from an internally tagged table, e.g. in TOML:
/// ```toml
/// [store]
/// backend = "file"
/// root = ".vn"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreBackend {
    /// Volatile, process-local storage.
    Memory,
    /// Durable JSON files under `root`.
    File { root: PathBuf },
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::File {
            root: PathBuf::from(".vn"),
        }
    }
}

/// Construct the configured backend.
pub fn open_store(backend: &StoreBackend) -> StoreResult<Box<dyn CollectionStore>> {
    match backend {
        StoreBackend::Memory => {
            tracing::debug!("opening in-memory collection store");
            Ok(Box::new(InMemoryCollectionStore::new()))
        }
        StoreBackend::File { root } => {
            tracing::debug!(root = %root.display(), "opening file collection store");
            Ok(Box::new(FileCollectionStore::open(root)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;

    #[test]
    fn default_backend_is_file_under_dot_vn() {
        assert_eq!(
            StoreBackend::default(),
            StoreBackend::File {
                root: PathBuf::from(".vn")
            }
        );
    }

    #[test]
    fn open_memory_backend() {
        let store = open_store(&StoreBackend::Memory).unwrap();
        store.write_raw(Collection::Voices, "[]").unwrap();
        assert_eq!(store.read_raw(Collection::Voices).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn open_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");
        let store = open_store(&StoreBackend::File { root: root.clone() }).unwrap();
        store.reset().unwrap();
        assert!(root.join("dats.json").is_file());
    }

    #[test]
    fn backend_deserializes_from_json_tag() {
        let memory: StoreBackend = serde_json::from_str(r#"{"backend":"memory"}"#).unwrap();
        assert_eq!(memory, StoreBackend::Memory);

        let file: StoreBackend =
            serde_json::from_str(r#"{"backend":"file","root":"/tmp/vn"}"#).unwrap();
        assert_eq!(
            file,
            StoreBackend::File {
                root: PathBuf::from("/tmp/vn")
            }
        );
    }
}
