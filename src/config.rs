//! Configuration Module
//!
//! Library options for a `RecentStore` and server settings loaded from
//! environment variables.

use std::env;
use std::path::PathBuf;

use crate::codec::TypePrefixes;

// == Store Config ==
/// Plain-data options for a `RecentStore`.
///
/// The admission predicate, structural codec and provider are passed to the
/// builder directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Size of the recency window
    pub max_size: usize,
    /// Reserved key holding the recency list
    pub recent_key: String,
    /// Separator between recency list items; may not appear in keys
    pub delimiter: String,
    /// Swap in a `MemoryStorage` when the provider fails the probe
    pub use_fallback_if_unavailable: bool,
    /// Entry cap of the fallback `MemoryStorage`
    pub fallback_capacity: usize,
    /// Try to read unprefixed values as JSON
    pub parse_existing_json: bool,
    pub type_prefixes: TypePrefixes,
    pub type_prefix_delimiter: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_size: 64,
            recent_key: "__recent".to_string(),
            delimiter: "\0".to_string(),
            use_fallback_if_unavailable: false,
            fallback_capacity: 1000,
            parse_existing_json: false,
            type_prefixes: TypePrefixes::default(),
            type_prefix_delimiter: "\0".to_string(),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Options for the served store
    pub store: StoreConfig,
    /// HTTP server port
    pub server_port: u16,
    /// JSON file backing the store; in-memory when unset
    pub storage_path: Option<PathBuf>,
    /// Byte quota of the file store
    pub storage_quota_bytes: usize,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_SIZE` - Recency window size (default: 64)
    /// - `RECENT_KEY` - Reserved recency key (default: `__recent`)
    /// - `FALLBACK_CAPACITY` - Entry cap of the in-memory store (default: 1000)
    /// - `USE_FALLBACK_IF_UNAVAILABLE` - Fall back to memory (default: false)
    /// - `PARSE_EXISTING_JSON` - Probe unprefixed values as JSON (default: false)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORAGE_PATH` - JSON file for persistent storage (default: unset)
    /// - `STORAGE_QUOTA_BYTES` - File store quota (default: 5 MiB)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let store = StoreConfig {
            max_size: env_or("MAX_SIZE", defaults.store.max_size),
            recent_key: env::var("RECENT_KEY").unwrap_or(defaults.store.recent_key),
            fallback_capacity: env_or("FALLBACK_CAPACITY", defaults.store.fallback_capacity),
            use_fallback_if_unavailable: env_or(
                "USE_FALLBACK_IF_UNAVAILABLE",
                defaults.store.use_fallback_if_unavailable,
            ),
            parse_existing_json: env_or("PARSE_EXISTING_JSON", defaults.store.parse_existing_json),
            ..defaults.store
        };

        Self {
            store,
            server_port: env_or("SERVER_PORT", defaults.server_port),
            storage_path: env::var("STORAGE_PATH").ok().map(PathBuf::from),
            storage_quota_bytes: env_or("STORAGE_QUOTA_BYTES", defaults.storage_quota_bytes),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            server_port: 3000,
            storage_path: None,
            storage_quota_bytes: 5 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default() {
        let config = StoreConfig::default();
        assert_eq!(config.max_size, 64);
        assert_eq!(config.recent_key, "__recent");
        assert_eq!(config.delimiter, "\0");
        assert!(!config.use_fallback_if_unavailable);
        assert!(!config.parse_existing_json);
        assert_eq!(config.type_prefix_delimiter, "\0");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert!(config.storage_path.is_none());
        assert_eq!(config.storage_quota_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("MAX_SIZE");
        env::remove_var("RECENT_KEY");
        env::remove_var("SERVER_PORT");
        env::remove_var("STORAGE_PATH");
        env::remove_var("STORAGE_QUOTA_BYTES");

        let config = Config::from_env();
        assert_eq!(config.store.max_size, 64);
        assert_eq!(config.store.recent_key, "__recent");
        assert_eq!(config.server_port, 3000);
        assert!(config.storage_path.is_none());
    }
}
