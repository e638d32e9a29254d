//! Configuration Module
//!
//! Handles loading the store connection and fetch cache settings from environment variables.

use std::env;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection URL of the key-value store
    pub redis_url: String,
    /// TTL in seconds for pages cached by the fetch cache
    pub page_ttl: u64,
    /// Timeout in seconds for remote fetches, enforced by the HTTP transport
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Store connection URL (default: redis://127.0.0.1:6379)
    /// - `PAGE_TTL` - Fetch cache TTL in seconds, at least 1 (default: 10)
    /// - `FETCH_TIMEOUT` - Remote fetch timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            page_ttl: env::var("PAGE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&ttl| ttl > 0)
                .unwrap_or(defaults.page_ttl),
            fetch_timeout: env::var("FETCH_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            page_ttl: crate::fetch::DEFAULT_PAGE_TTL,
            fetch_timeout: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.page_ttl, 10);
        assert_eq!(config.fetch_timeout, 30);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("REDIS_URL");
        env::remove_var("PAGE_TTL");
        env::remove_var("FETCH_TIMEOUT");

        let config = Config::from_env();
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.page_ttl, 10);
        assert_eq!(config.fetch_timeout, 30);
    }

    #[test]
    fn test_config_rejects_zero_page_ttl() {
        env::set_var("PAGE_TTL", "0");
        let config = Config::from_env();
        env::remove_var("PAGE_TTL");

        assert_eq!(config.page_ttl, 10);
    }
}
