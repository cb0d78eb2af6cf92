//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for registry logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive string.
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,

    /// Include source file and line in each event.
    pub with_source_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "parcel-registry".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REGISTRY_SERVICE_NAME`: Service name (default: parcel-registry)
    /// - `REGISTRY_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `REGISTRY_JSON_LOGS`: Enable JSON logs (default: false outside containers)
    /// - `REGISTRY_LOG_SOURCE`: Include file/line (default: false)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("REGISTRY_SERVICE_NAME")
                .unwrap_or_else(|_| "parcel-registry".to_string()),

            log_level: env::var("REGISTRY_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("REGISTRY_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            with_source_location: env::var("REGISTRY_LOG_SOURCE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    #[must_use]
    pub fn with_json_logs(mut self, json_logs: bool) -> Self {
        self.json_logs = json_logs;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
