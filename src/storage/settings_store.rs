//! Settings store
//!
//! Owns the in-memory settings and their persisted record. It is the only
//! code that reads or writes the `haccp_settings` key.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::error::StorageResult;
use crate::storage::kv::{read_record, KeyValueStore};
use crate::storage::types::Settings;

/// Well-known key of the settings record
pub const SETTINGS_KEY: &str = "haccp_settings";

pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
    current: RwLock<Settings>,
}

impl SettingsStore {
    /// Load persisted settings, falling back to defaults when the record is
    /// absent or corrupt.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let settings = read_record::<Settings>(kv.as_ref(), SETTINGS_KEY).unwrap_or_default();
        tracing::debug!(fridges = settings.fridges.len(), "Settings loaded");

        Self {
            kv,
            current: RwLock::new(settings),
        }
    }

    /// Current settings
    pub async fn load(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// Replace the settings wholesale (last write wins)
    pub async fn save(&self, settings: Settings) -> StorageResult<()> {
        let mut current = self.current.write().await;
        let content = serde_json::to_string(&settings)?;
        self.kv.set(SETTINGS_KEY, &content)?;
        *current = settings;

        tracing::info!(fridges = current.fridges.len(), "Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::{FileKvStore, MemoryKvStore};
    use crate::storage::types::Fridge;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let store = SettingsStore::open(Arc::new(MemoryKvStore::new()));
        assert_eq!(store.load().await, Settings::default());
    }

    #[tokio::test]
    async fn test_defaults_when_corrupt() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.set(SETTINGS_KEY, "][").unwrap();

        let store = SettingsStore::open(kv);
        assert_eq!(store.load().await, Settings::default());
    }

    #[tokio::test]
    async fn test_save_overwrites_and_persists() {
        let dir = tempdir().unwrap();
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::open(dir.path()).unwrap());

        let store = SettingsStore::open(Arc::clone(&kv));
        let settings = Settings {
            webhook_url: "https://hooks.example/haccp".to_string(),
            fridges: vec![Fridge::new("a", "Banco Frigo")],
            company_name: "Osteria".to_string(),
            company_address: "Via Po 2".to_string(),
            company_vat: "IT123".to_string(),
        };
        store.save(settings.clone()).await.unwrap();
        assert_eq!(store.load().await, settings);

        let reopened = SettingsStore::open(kv);
        assert_eq!(reopened.load().await, settings);
    }
}
