//! File-backed storage backend.
//!
//! All slots live in one JSON object (`{"key": "value", ...}`). Every write
//! rewrites the whole file through a temporary sibling and a rename, so a
//! crash mid-write leaves the previous contents in place.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{PersistentStore, StorageError};

type Slots = BTreeMap<String, String>;

/// Storage slots persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<Slots, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Slots::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Slots::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_slots(&self, slots: &Slots) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(slots)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PersistentStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // A corrupt file is replaced rather than blocking every future write
        let mut slots = match self.read_slots() {
            Ok(slots) => slots,
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable storage file");
                Slots::new()
            }
            Err(e) => return Err(e),
        };

        slots.insert(key.to_string(), value.to_string());
        self.write_slots(&slots)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        assert!(store.get("@RocketShoes:cart").unwrap().is_none());
    }

    #[test]
    fn test_set_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/storage.json");

        FileStore::new(&path).set("k", "[1,2,3]").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(!dir.path().join("nested/deeper/storage.json.tmp").exists());
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("a", "3").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_is_an_error_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get("k"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_corrupt_file_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
