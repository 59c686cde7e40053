//! Daily log store
//!
//! Append-only, most-recent-first sequence of signed submissions, persisted
//! as one record under `haccp_logs`. Entries are never edited or removed.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::error::StorageResult;
use crate::storage::kv::{read_record, KeyValueStore};
use crate::storage::types::DailyLog;

/// Well-known key of the log record
pub const LOGS_KEY: &str = "haccp_logs";

pub struct LogStore {
    kv: Arc<dyn KeyValueStore>,
    logs: RwLock<Vec<DailyLog>>,
}

impl LogStore {
    /// Load persisted logs; absent or corrupt records start an empty log
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let logs = read_record::<Vec<DailyLog>>(kv.as_ref(), LOGS_KEY).unwrap_or_default();
        tracing::debug!(entries = logs.len(), "Daily logs loaded");

        Self {
            kv,
            logs: RwLock::new(logs),
        }
    }

    /// All logs, most recent first
    pub async fn load(&self) -> Vec<DailyLog> {
        self.logs.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.logs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.logs.read().await.is_empty()
    }

    /// Insert `log` at the head and persist the full sequence.
    ///
    /// The in-memory sequence only changes once the write succeeded.
    pub async fn append(&self, log: DailyLog) -> StorageResult<()> {
        let mut logs = self.logs.write().await;

        let mut updated = Vec::with_capacity(logs.len() + 1);
        updated.push(log);
        updated.extend(logs.iter().cloned());

        let content = serde_json::to_string(&updated)?;
        self.kv.set(LOGS_KEY, &content)?;
        *logs = updated;

        tracing::info!(entries = logs.len(), "Daily log appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::error::StorageError;
    use crate::storage::kv::{FileKvStore, MemoryKvStore};
    use crate::storage::types::{Fridge, SignatureImage, TemperatureReading};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    fn make_log(minutes: i64, value: f64) -> DailyLog {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 7, 0, 0).unwrap() + Duration::minutes(minutes);
        DailyLog::new(
            vec![
                TemperatureReading::new(&Fridge::new("1", "Frigo Carni"), value),
                TemperatureReading::new(&Fridge::new("3", "Congelatore"), -18.5),
            ],
            SignatureImage::from_png(&[minutes as u8, 1, 2]),
            at,
        )
    }

    /// Store whose writes always fail
    struct ReadOnlyKv;

    impl KeyValueStore for ReadOnlyKv {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[tokio::test]
    async fn test_empty_when_absent() {
        let store = LogStore::open(Arc::new(MemoryKvStore::new()));
        assert!(store.is_empty().await);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_append_is_most_recent_first() {
        let store = LogStore::open(Arc::new(MemoryKvStore::new()));
        let logs: Vec<DailyLog> = (0..5).map(|i| make_log(i * 60, 2.0 + i as f64)).collect();

        for log in &logs {
            store.append(log.clone()).await.unwrap();
        }

        let loaded = store.load().await;
        let expected: Vec<DailyLog> = logs.into_iter().rev().collect();
        assert_eq!(loaded, expected);
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn test_append_survives_reopen() {
        let dir = tempdir().unwrap();
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::open(dir.path()).unwrap());

        let store = LogStore::open(Arc::clone(&kv));
        store.append(make_log(0, 3.5)).await.unwrap();
        store.append(make_log(1440, 4.0)).await.unwrap();
        let before = store.load().await;

        let reopened = LogStore::open(kv);
        assert_eq!(reopened.load().await, before);
        assert_eq!(reopened.load().await[0].readings[0].value, 4.0);
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let store = LogStore::open(Arc::new(MemoryKvStore::new()));
        let log = make_log(0, 3.0);
        store.append(log.clone()).await.unwrap();
        store.append(log).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_untouched() {
        let store = LogStore::open(Arc::new(ReadOnlyKv));
        let result = store.append(make_log(0, 3.0)).await;

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(store.is_empty().await);
    }
}
