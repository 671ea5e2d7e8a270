use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Storage;
use crate::error::StorageError;

/// Storage file name in the data directory
const STORAGE_FILE: &str = "storage.json";

/// Key/value storage persisted as one JSON object on disk.
///
/// The whole map is kept in memory and rewritten on every change, so reads
/// never touch the disk. A missing or unreadable file opens as empty.
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or prepare to create) `storage.json` inside `dir`
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(STORAGE_FILE);

        let entries = if path.exists() {
            let contents = std::fs::read(&path)?;
            match serde_json::from_slice(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Storage file unreadable, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = entries.len(), "Storage opened");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("theme", "light").unwrap();
        storage.set("last_tab", "chat").unwrap();
        drop(storage);

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("theme").as_deref(), Some("light"));
        assert_eq!(reopened.get("last_tab").as_deref(), Some("chat"));
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("session", "{}").unwrap();
        storage.remove("session").unwrap();
        drop(storage);

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert!(reopened.get("session").is_none());
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), "not json").unwrap();

        let mut storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.get("theme").is_none());

        // Next write replaces the corrupt file
        storage.set("theme", "dark").unwrap();
        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_non_utf8_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let mut storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.get("session").is_none());

        storage.set("theme", "light").unwrap();
        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("lumi").join("data");
        let mut storage = FileStorage::open(&nested).unwrap();
        storage.set("k", "v").unwrap();
        assert!(nested.join(STORAGE_FILE).exists());
    }
}
