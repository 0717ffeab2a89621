//! Authorization core configuration.
//!
//! Loaded from environment variables with defaults; nothing is required.
//! The tier permission tables themselves are compiled in and never
//! configurable at runtime.

use std::time::Duration;

/// Configuration for the authorization core.
#[derive(Debug, Clone)]
pub struct AuthzConfig {
    /// Upper bound on a single configuration-store query. Expiry is
    /// reported as a store failure, never a grant.
    pub store_timeout: Duration,

    /// Whether to keep an advisory read-through cache of tier membership
    /// sets. The store stays the source of truth either way.
    pub cache_enabled: bool,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(2000),
            cache_enabled: true,
        }
    }
}

impl AuthzConfig {
    /// Creates configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AUTHZ_STORE_TIMEOUT_MS`: Store query bound in milliseconds (default: 2000)
    /// - `AUTHZ_CACHE_ENABLED`: Enable the membership cache (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("AUTHZ_STORE_TIMEOUT_MS") {
            if let Ok(ms) = val.trim().parse::<u64>() {
                config.store_timeout = Duration::from_millis(ms);
            }
        }
        if let Ok(val) = std::env::var("AUTHZ_CACHE_ENABLED") {
            config.cache_enabled = val.trim().parse().unwrap_or(true);
        }

        config
    }
}
