//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::capture::{TemperatureCapture, WebhookSender};
use crate::config::Config;
use crate::storage::{KeyValueStore, LogStore, SettingsStore};

/// Shared application state for all handlers
pub struct AppState {
    /// Raw key-value store, used by the readiness probe
    pub kv: Arc<dyn KeyValueStore>,
    pub settings: Arc<SettingsStore>,
    pub logs: Arc<LogStore>,
    pub webhook: Arc<dyn WebhookSender>,
    /// The single Temperature capture session
    pub capture: Arc<Mutex<TemperatureCapture>>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Open both stores on `kv`
    pub fn new(kv: Arc<dyn KeyValueStore>, webhook: Arc<dyn WebhookSender>, config: ApiConfig) -> Self {
        let settings = Arc::new(SettingsStore::open(Arc::clone(&kv)));
        let logs = Arc::new(LogStore::open(Arc::clone(&kv)));
        let capture = TemperatureCapture::new(config.success_display);

        Self {
            kv,
            settings,
            logs,
            webhook,
            capture: Arc::new(Mutex::new(capture)),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// View server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout
    pub request_timeout: Duration,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// How long a successful submission blocks new ones
    pub success_display: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8082,
            request_timeout: Duration::from_secs(30),
            max_body_size: 5 * 1024 * 1024, // signatures travel as data URLs
            success_display: Duration::from_millis(crate::capture::DEFAULT_SUCCESS_DISPLAY_MS),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Server settings from the loaded configuration file
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            request_timeout: config.api.request_timeout(),
            success_display: config.capture.success_display(),
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.api.port = 9000;
        config.capture.success_display_ms = 500;

        let api = ApiConfig::from_config(&config);
        assert_eq!(api.addr(), "127.0.0.1:9000");
        assert_eq!(api.success_display, Duration::from_millis(500));
        assert_eq!(api.request_timeout, Duration::from_secs(30));
    }
}
