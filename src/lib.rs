//! # HACCP Desk
//!
//! Temperature logbook for small food-service kitchens: daily fridge
//! readings with a handwritten signature, 60×40 mm food labels and a
//! monthly HACCP register in PDF.
//!
//! ## Features
//!
//! - **Local storage**: settings and daily logs kept as JSON records on disk
//! - **Signed readings**: one reading per fridge, a drawn signature, optional
//!   webhook copy of every submission
//! - **Documents**: ingredient and preparation labels, monthly reports
//! - **Three surfaces**: CLI, local view server, browser front end
//!
//! ## Modules
//!
//! - [`storage`]: Key-value store, settings and daily log stores
//! - [`capture`]: Temperature entry, signature surface, submission workflow
//! - [`settings_editor`]: Draft editing of fridges, identity and webhook
//! - [`documents`]: Label and monthly report PDFs
//! - [`dashboard`]: Overview of recent activity
//! - [`api`]: Local view server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use haccp_desk::capture::{CaptureDeps, HttpWebhook, TemperatureCapture};
//! use haccp_desk::prompt::TerminalPrompter;
//! use haccp_desk::storage::{FileKvStore, KeyValueStore, LogStore, SettingsStore, SignatureImage};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let kv: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::open("./haccp_data")?);
//!     let settings = SettingsStore::open(Arc::clone(&kv));
//!     let logs = LogStore::open(kv);
//!     let webhook = HttpWebhook::new(Duration::from_secs(10))?;
//!     let prompter = TerminalPrompter::new(false);
//!
//!     let mut capture = TemperatureCapture::default();
//!     capture.readings_mut().set("1", "3.5");
//!     capture
//!         .signature_mut()
//!         .adopt(SignatureImage::from_png(&std::fs::read("firma.png")?));
//!
//!     let deps = CaptureDeps {
//!         settings: &settings,
//!         logs: &logs,
//!         webhook: &webhook,
//!         prompter: &prompter,
//!     };
//!     let receipt = capture.submit(&deps, chrono::Utc::now()).await?;
//!     println!("Saved log {}", receipt.log.id);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod capture;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod prompt;
pub mod settings_editor;
pub mod storage;
pub mod telemetry;

// Re-export top-level types for convenience
pub use storage::{
    DailyLog, FileKvStore, Fridge, KeyValueStore, LogStore, MemoryKvStore, Settings,
    SettingsStore, SignatureImage, StorageError, StorageResult, TemperatureReading,
};

pub use capture::{
    CaptureDeps, CaptureError, CaptureStatus, HttpWebhook, SignaturePad, SubmitReceipt,
    TemperatureCapture, WebhookDelivery, WebhookSender,
};

pub use documents::{LabelSpec, MonthlyReport, RenderedDocument};

pub use dashboard::DashboardSummary;

pub use settings_editor::{EditorError, SettingsEditor};

pub use prompt::{CollectingPrompter, Prompter, TerminalPrompter};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{
    ApiConfig as ConfigApiConfig, CaptureConfig, Config, ConfigError, LoggingConfig,
    StorageConfig, WebhookConfig,
};
