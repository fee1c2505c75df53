//! Process-local cache store

use async_trait::async_trait;
use dashmap::DashMap;

use super::CacheProvider;
use super::CachedValue;

/// Cache entries held in a [`DashMap`]. Nothing survives a restart.
///
/// Expired entries are dropped lazily on read, or in bulk by `gc`.
///
/// # Example
///
/// ```
/// use archive_lib::cache::InMemoryCache;
///
/// let cache = InMemoryCache::new();
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCache {
    store: DashMap<String, CachedValue>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Stored entries, expired ones included until they are read or collected.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl CacheProvider for InMemoryCache {
    async fn get(&self, key: &str) -> Option<CachedValue> {
        let entry = self.store.get(key)?;
        let value = entry.value();

        if value.is_expired() {
            drop(entry);
            self.store.remove(key);
            None
        } else {
            Some(value.clone())
        }
    }

    async fn set(&self, key: &str, value: CachedValue) {
        self.store.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) -> bool {
        self.store.remove(key).is_some()
    }

    async fn remove_prefix(&self, prefix: &str) -> usize {
        let before = self.store.len();
        self.store.retain(|key, _| !key.starts_with(prefix));
        before.saturating_sub(self.store.len())
    }

    async fn clear(&self) {
        self.store.clear();
    }

    async fn gc(&self) -> usize {
        let mut removed = 0;
        self.store.retain(|_, value| {
            if value.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}
