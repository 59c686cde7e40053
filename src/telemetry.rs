//! Tracing setup shared by the binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter from `RUST_LOG`, else the configured level for this crate
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("haccp_desk={},tower_http=info", config.level))
    })
}

/// Install the global subscriber on stderr, keeping stdout for command
/// output. `json` selects structured output, anything else the
/// human-readable format.
pub fn init(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}
