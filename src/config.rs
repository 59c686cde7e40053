//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `HACCP_*` environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("haccp-desk").to_string_lossy().to_string())
        .unwrap_or_else(|| "./haccp_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~` expanded
    pub fn data_path(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }
}

/// View server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Outbound webhook configuration. The URL itself lives in the settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "default_webhook_timeout")]
    pub timeout_ms: u64,
}

fn default_webhook_timeout() -> u64 {
    crate::capture::webhook::DEFAULT_TIMEOUT_MS
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_webhook_timeout(),
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Temperature capture configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    /// How long a successful submission is displayed before the form resets
    #[serde(default = "default_success_display")]
    pub success_display_ms: u64,
}

fn default_success_display() -> u64 {
    crate::capture::DEFAULT_SUCCESS_DISPLAY_MS
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            success_display_ms: default_success_display(),
        }
    }
}

impl CaptureConfig {
    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Check settings that only make sense together.
    ///
    /// A webhook call has to finish inside the request that triggered it,
    /// otherwise the client sees a timeout for a save that went through.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook.timeout() >= self.api.request_timeout() {
            return Err(ConfigError::Invalid(format!(
                "webhook timeout ({} ms) must be shorter than the request timeout ({} s)",
                self.webhook.timeout_ms, self.api.request_timeout_secs
            )));
        }
        Ok(())
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("haccp-desk").join("config.toml")),
            Some(PathBuf::from("/etc/haccp-desk/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `HACCP_*` overrides read through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = lookup("HACCP_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(host) = lookup("HACCP_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("HACCP_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        if let Some(timeout) = lookup("HACCP_WEBHOOK_TIMEOUT_MS").and_then(|t| t.parse().ok()) {
            self.webhook.timeout_ms = timeout;
        }

        if let Some(level) = lookup("HACCP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("HACCP_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# HACCP Desk Configuration
#
# Environment variables override these settings:
# - HACCP_DATA_DIR
# - HACCP_API_HOST
# - HACCP_API_PORT
# - HACCP_WEBHOOK_TIMEOUT_MS
# - HACCP_LOG_LEVEL
# - HACCP_LOG_FORMAT

[storage]
# Directory holding haccp_settings.json and haccp_logs.json
data_dir = "~/.local/share/haccp-desk"

[api]
# Local view server; keep it on localhost
host = "127.0.0.1"
port = 8082
request_timeout_secs = 30

[webhook]
# The webhook URL is set from the Settings view.
# Requests are sent once and their answer is not read.
timeout_ms = 10000

[capture]
# How long a saved submission is shown before the form resets
success_display_ms = 2000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty, json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.api.port, 8082);
        assert_eq!(config.webhook.timeout(), Duration::from_secs(10));
        assert_eq!(config.capture.success_display(), Duration::from_secs(2));
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[api]\nport = 9000\n").unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.capture.success_display_ms, 2000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("HACCP_DATA_DIR", "/tmp/haccp"),
            ("HACCP_API_PORT", "9100"),
            ("HACCP_WEBHOOK_TIMEOUT_MS", "250"),
            ("HACCP_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.data_dir, "/tmp/haccp");
        assert_eq!(config.api.port, 9100);
        assert_eq!(config.webhook.timeout_ms, 250);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_webhook_timeout_must_fit_in_request() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.api.request_timeout_secs = 5;
        config.webhook.timeout_ms = 5_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.webhook.timeout_ms = 4_999;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "HACCP_API_PORT").then(|| "abc".to_string()));
        assert_eq!(config.api.port, 8082);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nport = ").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_data_path_expands_home() {
        let storage = StorageConfig {
            data_dir: "/var/lib/haccp".to_string(),
        };
        assert_eq!(storage.data_path(), PathBuf::from("/var/lib/haccp"));

        let storage = StorageConfig {
            data_dir: "~/haccp".to_string(),
        };
        assert!(storage.data_path().ends_with("haccp"));
    }
}
