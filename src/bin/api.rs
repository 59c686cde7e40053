//! HACCP Desk view server
//!
//! Run with: cargo run --bin haccp-desk-api [-- --config PATH]
//!
//! # Configuration
//!
//! Read from the config file (see `haccp-desk config`), then overridden by
//! environment variables:
//! - `HACCP_DATA_DIR`: Data directory (default: the platform data dir + haccp-desk)
//! - `HACCP_API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `HACCP_API_PORT`: Port to listen on (default: 8082)
//! - `HACCP_WEBHOOK_TIMEOUT_MS`: Webhook request timeout (default: 10000)
//! - `HACCP_LOG_LEVEL`, `HACCP_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Log filter, overrides the level

use clap::Parser;
use haccp_desk::api::{serve, ApiConfig, AppState};
use haccp_desk::capture::HttpWebhook;
use haccp_desk::config::Config;
use haccp_desk::storage::{FileKvStore, KeyValueStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "haccp-desk-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local view server for the HACCP Desk front end")]
struct Args {
    /// Config file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    config.validate()?;
    haccp_desk::telemetry::init(&config.logging);

    tracing::info!("Starting HACCP Desk view server v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.storage.data_path();
    tracing::info!("Data directory: {:?}", data_dir);
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::open(&data_dir)?);

    let webhook = Arc::new(HttpWebhook::new(config.webhook.timeout())?);
    let api_config = ApiConfig::from_config(&config);
    let state = AppState::new(kv, webhook, api_config.clone());

    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("HACCP Desk view server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_flag() {
        let args = Args::try_parse_from(["haccp-desk-api", "--config", "/etc/haccp.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/etc/haccp.toml")));

        let args = Args::try_parse_from(["haccp-desk-api", "--config=local.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("local.toml")));

        assert!(Args::try_parse_from(["haccp-desk-api"]).unwrap().config.is_none());
    }

    #[test]
    fn test_config_flag_needs_a_value() {
        assert!(Args::try_parse_from(["haccp-desk-api", "--config"]).is_err());
        assert!(Args::try_parse_from(["haccp-desk-api", "--port", "80"]).is_err());
    }
}
