//! Key-value record storage
//!
//! The stores persist each collection as one serialized blob under a fixed
//! key, the way the browser build used local storage. `FileKvStore` keeps one
//! file per key under the data directory; `MemoryKvStore` backs tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::storage::error::{StorageError, StorageResult};

/// Blob storage addressed by well-known keys
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`, `None` if absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the blob stored under `key`
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// One `<key>.json` file per record in a data directory
#[derive(Debug, Clone)]
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    /// Open (and create if needed) the data directory
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        // Write beside the target and rename so readers never see a torn record
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!(key = %key, bytes = value.len(), "Record written");
        Ok(())
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.records
            .lock()
            .map_err(|e| StorageError::Io(std::io::Error::other(e.to_string())))
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.records()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.records()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and decode the record under `key`.
///
/// Absent records and unreadable or undecodable ones both yield `None`. An
/// undecodable blob is copied to `<key>.corrupt` before the caller falls back
/// to defaults, so the next save does not silently destroy it.
pub(crate) fn read_record<T>(kv: &dyn KeyValueStore, key: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read record, using defaults");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Corrupt record, using defaults");
            let backup = format!("{}.corrupt", key);
            if let Err(e) = kv.set(&backup, &raw) {
                tracing::warn!(key = %backup, error = %e, "Failed to preserve corrupt record");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_record_preserves_corrupt_blob() {
        let store = MemoryKvStore::new();
        store.set("haccp_logs", "{not json").unwrap();

        let value: Option<Vec<u32>> = read_record(&store, "haccp_logs");
        assert!(value.is_none());
        assert_eq!(
            store.get("haccp_logs.corrupt").unwrap().as_deref(),
            Some("{not json")
        );

        let missing: Option<Vec<u32>> = read_record(&store, "absent");
        assert!(missing.is_none());
        assert_eq!(store.get("absent.corrupt").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::open(dir.path().join("data")).unwrap();

        assert_eq!(store.get("haccp_logs").unwrap(), None);

        store.set("haccp_logs", "[]").unwrap();
        assert_eq!(store.get("haccp_logs").unwrap().as_deref(), Some("[]"));

        store.set("haccp_logs", "[1]").unwrap();
        assert_eq!(store.get("haccp_logs").unwrap().as_deref(), Some("[1]"));
        assert!(dir.path().join("data").join("haccp_logs.json").exists());
        assert!(!dir.path().join("data").join("haccp_logs.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.get(".hidden"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
