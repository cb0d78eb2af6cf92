//! `tracing-subscriber` setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Build the filter from `RUST_LOG` if set, else from the configured level.
pub(crate) fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Install the global subscriber.
pub(crate) fn init_subscriber(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    if config.json_logs {
        let json_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(config.with_source_location)
            .with_line_number(config.with_source_location)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_file(config.with_source_location)
            .with_line_number(config.with_source_location)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
    }
}
