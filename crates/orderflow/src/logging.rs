//! Subscriber setup for binaries embedding the engine.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::error::OrderflowError;

/// Installs the global tracing subscriber and routes `log` records into it.
///
/// `RUST_LOG` overrides the configured level. Fails if a global subscriber
/// is already set.
pub fn init(config: &LoggingConfig) -> Result<(), OrderflowError> {
    let filter = build_filter(config)?;

    let (pretty, json) = match config.format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer().with_target(true)), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| OrderflowError::Logging(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| OrderflowError::Logging(e.to_string()))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, OrderflowError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            OrderflowError::Logging(format!("invalid log level '{}': {}", config.level, e))
        }),
    }
}
