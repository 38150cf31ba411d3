//! Configuration for the config store

use std::env;

/// Configuration for the config store
#[derive(Debug, Clone)]
pub struct ConfigStoreConfig {
    /// TTL in seconds for fee/pair/swap config caches
    pub config_ttl_secs: u64,
    /// TTL in seconds for site setting caches
    pub setting_ttl_secs: u64,
}

impl Default for ConfigStoreConfig {
    fn default() -> Self {
        Self {
            config_ttl_secs: env::var("CONFIG_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
            setting_ttl_secs: env::var("SETTINGS_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
        }
    }
}

impl ConfigStoreConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a configuration with explicit TTLs
    pub fn new(config_ttl_secs: u64, setting_ttl_secs: u64) -> Self {
        Self {
            config_ttl_secs,
            setting_ttl_secs,
        }
    }

    /// Configuration with caching disabled, for tests that must observe
    /// every write immediately
    pub fn uncached() -> Self {
        Self::new(0, 0)
    }
}
