use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collection::Collection;
use crate::error::StoreResult;
use crate::traits::CollectionStore;

/// Durable collection store: one JSON file per collection.
///
/// On-disk layout:
/// ```text
/// <root>/voices.json
/// <root>/dats.json
/// <root>/royalties.json
/// ```
///
/// Writes go to a temporary file in `<root>` which is then renamed over the
/// target, so a crash mid-write leaves the previous version intact.
#[derive(Debug, Clone)]
pub struct FileCollectionStore {
    root: PathBuf,
}

impl FileCollectionStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `collection`.
    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.root.join(format!("{}.json", collection.key()))
    }
}

impl CollectionStore for FileCollectionStore {
    fn read_raw(&self, collection: Collection) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(collection)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_raw(&self, collection: Collection, json: &str) -> StoreResult<()> {
        let target = self.path_for(collection);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        debug!(path = %target.display(), bytes = json.len(), "collection file replaced");
        Ok(())
    }
}
