//! Logging initialization built on tracing-subscriber.
//!
//! Honors the configured level as a default filter; `RUST_LOG` overrides it
//! when set. Output is either human-readable or JSON.

use tracing_subscriber::EnvFilter;

use crate::config::LoggerConfig;

/// Initializes the global tracing subscriber from logger settings.
///
/// Must be called once, before the first log statement.
pub fn init_logging(config: &LoggerConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;
        }
    }
    Ok(())
}
