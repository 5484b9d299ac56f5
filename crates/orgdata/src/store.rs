//! Persisted key-value storage for small client-side state.
//!
//! The contract mirrors what the console needs from the platform: a
//! string-keyed slot holding a UTF-8 blob, get/set only, no transactions.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use common::Error;

/// A durable string-keyed slot store.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `None` when the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Overwrite a slot (last-write-wins, no versioning).
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// File-backed store: one file per key under a state directory. Survives
/// process restarts, which is all the directory cache needs.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Store(format!("read {}: {}", key, e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::Store(format!("create {}: {}", self.dir.display(), e)))?;
        std::fs::write(self.path_for(key), value)
            .map_err(|e| Error::Store(format!("write {}: {}", key, e)))
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.get("orgIds").unwrap(), None);
        store.set("orgIds", r#"{"data":[],"timestamp":0}"#).unwrap();
        assert_eq!(
            store.get("orgIds").unwrap().as_deref(),
            Some(r#"{"data":[],"timestamp":0}"#)
        );
    }

    #[test]
    fn file_store_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("slot", "first").unwrap();
        store.set("slot", "second").unwrap();
        assert_eq!(store.get("slot").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
