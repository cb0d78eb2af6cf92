//! # Registry Telemetry
//!
//! Structured logging for the Parcel Registry.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registry_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REGISTRY_SERVICE_NAME` | `parcel-registry` | Service name in logs |
//! | `REGISTRY_LOG_LEVEL` | `info` | Log level filter |
//! | `REGISTRY_JSON_LOGS` | `false` | JSON output |
//! | `REGISTRY_LOG_SOURCE` | `false` | File/line in events |

mod config;
mod subscriber;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global logging subscriber.
///
/// Logs go to stderr so that stdout stays free for response payloads.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    subscriber::init_subscriber(config)?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}
