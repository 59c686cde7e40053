//! HACCP Desk storage
//!
//! This module provides the persisted state of the application:
//!
//! - **types**: Core records (Fridge, Settings, DailyLog, SignatureImage)
//! - **kv**: Key-value blob storage (file-backed and in-memory)
//! - **settings_store**: Settings, overwritten wholesale on save
//! - **log_store**: Append-only daily log, most recent first
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! <data_dir>/
//!   haccp_settings.json   Settings record
//!   haccp_logs.json       DailyLog sequence (most recent first)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use haccp_desk::storage::{FileKvStore, KeyValueStore, LogStore, SettingsStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let kv: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::open("./haccp_data")?);
//!     let settings = SettingsStore::open(Arc::clone(&kv));
//!     let logs = LogStore::open(kv);
//!
//!     println!("{} fridges, {} logs", settings.load().await.fridges.len(), logs.len().await);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kv;
pub mod log_store;
pub mod settings_store;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use kv::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use log_store::{LogStore, LOGS_KEY};
pub use settings_store::{SettingsStore, SETTINGS_KEY};
pub use types::{DailyLog, Fridge, Settings, SignatureImage, TemperatureReading};
