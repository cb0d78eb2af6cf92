//! Registry configuration.

use crate::domain::SEED_KEY_PREFIX;
use std::env;

/// Configuration for the Parcel Registry service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Inclusive start of the `queryAllLands` range.
    pub range_start_key: String,
    /// Exclusive end of the `queryAllLands` range.
    pub range_end_key: String,
    /// Prefix of seed keys (`<prefix>0` .. `<prefix>9`).
    pub seed_key_prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            range_start_key: format!("{SEED_KEY_PREFIX}0"),
            range_end_key: format!("{SEED_KEY_PREFIX}999"),
            seed_key_prefix: SEED_KEY_PREFIX.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REGISTRY_RANGE_START`: range scan start (default: LAND0)
    /// - `REGISTRY_RANGE_END`: range scan end, exclusive (default: LAND999)
    /// - `REGISTRY_SEED_PREFIX`: seed key prefix (default: LAND)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            range_start_key: env::var("REGISTRY_RANGE_START").unwrap_or(defaults.range_start_key),
            range_end_key: env::var("REGISTRY_RANGE_END").unwrap_or(defaults.range_end_key),
            seed_key_prefix: env::var("REGISTRY_SEED_PREFIX").unwrap_or(defaults.seed_key_prefix),
        }
    }
}
