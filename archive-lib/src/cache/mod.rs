//! Row-data caching layer
//!
//! Provides a `CacheProvider` trait with an in-memory implementation, and a
//! typed [`QueryCache`] on top of it that stores list-endpoint results under
//! a [`QueryKey`] with a TTL. Expiry is the only eviction.

mod config;
mod memory;
mod query;

pub use config::*;
pub use memory::*;
pub use query::*;

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

/// Encoded bytes plus the window in which they may be served.
#[derive(Debug, Clone)]
pub struct CachedValue {
    /// bincode-encoded payload.
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
    /// First instant at which the entry is stale.
    pub expires_at: DateTime<Utc>,
}

impl CachedValue {
    /// Stamps `data` as created now and stale after `ttl`.
    ///
    /// A TTL too large for chrono expires immediately.
    pub fn with_ttl(data: Vec<u8>, ttl: Duration) -> Self {
        let created_at = Utc::now();
        let lifetime = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        Self {
            data,
            created_at,
            expires_at: created_at + lifetime,
        }
    }

    /// Check if the entry is stale.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Time left before the entry goes stale, `None` once it has.
    pub fn remaining(&self) -> Option<Duration> {
        (self.expires_at - Utc::now()).to_std().ok().filter(|d| !d.is_zero())
    }
}

/// Byte store behind [`QueryCache`], keyed by strings.
///
/// `get` must never hand out an expired entry.
#[async_trait]
pub trait CacheProvider: Send + Sync {
    async fn get(&self, key: &str) -> Option<CachedValue>;

    /// Inserts or replaces `key`.
    async fn set(&self, key: &str, value: CachedValue);

    /// Drops `key`. Returns `true` if it was present.
    async fn remove(&self, key: &str) -> bool;

    /// Drops every key starting with `prefix`. Returns how many were dropped.
    async fn remove_prefix(&self, prefix: &str) -> usize;

    async fn clear(&self);

    /// Drops expired entries. Returns how many were dropped.
    async fn gc(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_window() {
        let value = CachedValue::with_ttl(vec![1], Duration::from_secs(60));
        assert!(!value.is_expired());
        assert!(value.remaining().is_some_and(|left| left <= Duration::from_secs(60)));

        let stale = CachedValue::with_ttl(vec![1], Duration::ZERO);
        assert!(stale.is_expired());
        assert_eq!(stale.remaining(), None);
    }
}
