//! Cache configuration

use std::time::Duration;

/// How long list results stay cached.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use archive_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default().with_list_ttl(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for list-endpoint results.
    ///
    /// Default: 5 minutes
    pub list_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list TTL.
    pub fn with_list_ttl(mut self, ttl: Duration) -> Self {
        self.list_ttl = ttl;
        self
    }

    /// Creates a config with no caching (zero TTL).
    pub fn no_cache() -> Self {
        Self {
            list_ttl: Duration::ZERO,
        }
    }

    /// Returns `true` if results are never served from cache.
    pub fn is_disabled(&self) -> bool {
        self.list_ttl.is_zero()
    }
}
