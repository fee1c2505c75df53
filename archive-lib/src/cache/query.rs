//! Typed cache of list-endpoint results

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use log::debug;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::CacheConfig;
use super::CacheProvider;
use super::CachedValue;
use super::InMemoryCache;
use crate::error::CacheError;
use crate::error::Error;
use crate::model::TenantId;
use crate::response::Response;

/// Identifies one row-data query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Documents of one tenant: `documents:{tenant}`.
    Documents(TenantId),
    /// All users: `users`.
    Users,
}

impl QueryKey {
    /// Prefix shared by every document query.
    pub const DOCUMENTS_PREFIX: &'static str = "documents:";

    /// Documents of a tenant.
    pub fn documents(tenant: impl Into<TenantId>) -> Self {
        Self::Documents(tenant.into())
    }

    /// The string key stored in the cache provider.
    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Documents(tenant) => write!(f, "{}{}", Self::DOCUMENTS_PREFIX, tenant),
            Self::Users => f.write_str("users"),
        }
    }
}

/// Typed, TTL-bound cache of row data.
///
/// Values are stored bincode-encoded. The cache is shared: clones point at
/// the same provider.
///
/// # Example
///
/// ```ignore
/// let cache = QueryCache::in_memory(CacheConfig::default());
/// let key = QueryKey::documents("uni");
/// let documents = cache.fetch(&key, || client.list_documents(&tenant)).await?;
///
/// // After a successful mutation:
/// cache.invalidate(&key).await;
/// ```
#[derive(Clone)]
pub struct QueryCache {
    provider: Arc<dyn CacheProvider>,
    config: CacheConfig,
}

impl QueryCache {
    /// Creates a cache over any provider.
    pub fn new(provider: impl CacheProvider + 'static, config: CacheConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Creates a cache over a fresh [`InMemoryCache`].
    pub fn in_memory(config: CacheConfig) -> Self {
        Self::new(InMemoryCache::new(), config)
    }

    /// Returns the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Reads a cached value.
    ///
    /// Returns `Ok(None)` when nothing is cached or the entry expired.
    /// Undecodable entries are removed and reported as an error.
    pub async fn get<T>(&self, key: &QueryKey) -> Result<Option<Response<T>>, CacheError>
    where
        T: DeserializeOwned,
    {
        let cache_key = key.cache_key();
        let Some(cached) = self.provider.get(&cache_key).await else {
            return Ok(None);
        };
        match bincode::deserialize::<T>(&cached.data) {
            Ok(data) => Ok(Some(Response::cache_hit(
                data,
                cached.created_at,
                cached.expires_at,
            ))),
            Err(source) => {
                self.provider.remove(&cache_key).await;
                Err(CacheError::Deserialization {
                    key: cache_key,
                    source,
                })
            }
        }
    }

    /// Stores a value under `key` with the configured TTL.
    pub async fn set<T>(&self, key: &QueryKey, value: &T) -> Result<CachedValue, CacheError>
    where
        T: Serialize + ?Sized,
    {
        let data = bincode::serialize(value).map_err(CacheError::Serialization)?;
        let cached = CachedValue::with_ttl(data, self.config.list_ttl);
        self.provider.set(&key.cache_key(), cached.clone()).await;
        Ok(cached)
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its result.
    ///
    /// Fetch errors are returned as-is and nothing is cached. Cache errors
    /// are logged and treated as a miss.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<Response<T>, Error>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if self.config.is_disabled() {
            return Ok(Response::new(fetch().await?));
        }

        match self.get::<T>(key).await {
            Ok(Some(response)) => {
                debug!("Cache hit for {}", key);
                return Ok(response);
            }
            Ok(None) => debug!("Cache miss for {}", key),
            Err(e) => warn!("Ignoring cache entry: {}", e),
        }

        let data = fetch().await?;
        match self.set(key, &data).await {
            Ok(cached) => Ok(Response::cache_miss(data, cached.created_at, cached.expires_at)),
            Err(e) => {
                warn!("Not caching {}: {}", key, e);
                Ok(Response::new(data))
            }
        }
    }

    /// Drops the cached value for `key`. Returns `true` if one existed.
    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        let removed = self.provider.remove(&key.cache_key()).await;
        debug!("Invalidated {} (cached: {})", key, removed);
        removed
    }

    /// Drops every cached value whose key starts with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        let removed = self.provider.remove_prefix(prefix).await;
        debug!("Invalidated {} entries under {:?}", removed, prefix);
        removed
    }

    /// Drops everything.
    pub async fn clear(&self) {
        self.provider.clear().await;
    }

    /// Removes expired entries. Returns the number removed.
    pub async fn gc(&self) -> usize {
        self.provider.gc().await
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_query_keys() {
        assert_eq!(QueryKey::documents("uni").cache_key(), "documents:uni");
        assert_eq!(QueryKey::Users.cache_key(), "users");
    }

    #[tokio::test]
    async fn test_fetch_caches_until_invalidated() {
        let cache = QueryCache::in_memory(CacheConfig::default());
        let key = QueryKey::Users;
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Error>(vec!["a".to_string(), "b".to_string()])
        };

        let first = cache.fetch(&key, fetch).await.unwrap();
        assert!(first.is_fresh());
        let second = cache.fetch(&key, fetch).await.unwrap();
        assert!(second.is_cached());
        assert_eq!(second.data(), &vec!["a".to_string(), "b".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(cache.invalidate(&key).await);
        cache.fetch(&key, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let cache = QueryCache::in_memory(CacheConfig::default());
        let key = QueryKey::documents("uni");
        let result: Result<Response<Vec<u32>>, Error> = cache
            .fetch(&key, || async { Err(ApiError::http(500, "down").into()) })
            .await;
        assert!(result.is_err());
        assert!(cache.get::<Vec<u32>>(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_always_fetches() {
        let cache = QueryCache::in_memory(CacheConfig::no_cache());
        let key = QueryKey::Users;
        let response = cache.fetch(&key, || async { Ok::<_, Error>(1u8) }).await.unwrap();
        assert_eq!(response.cache, crate::CacheStatus::None);
        assert!(cache.get::<u8>(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_dropped() {
        let cache = QueryCache::in_memory(CacheConfig::default());
        let key = QueryKey::Users;
        cache.set(&key, &1u8).await.unwrap();
        // One byte cannot decode as a u64.
        assert!(cache.get::<u64>(&key).await.is_err());
        assert!(cache.get::<u8>(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_prefix_spares_users() {
        let cache = QueryCache::in_memory(CacheConfig::default());
        cache.set(&QueryKey::documents("a"), &1u8).await.unwrap();
        cache.set(&QueryKey::documents("b"), &1u8).await.unwrap();
        cache.set(&QueryKey::Users, &1u8).await.unwrap();
        assert_eq!(cache.invalidate_prefix(QueryKey::DOCUMENTS_PREFIX).await, 2);
        assert!(cache.get::<u8>(&QueryKey::Users).await.unwrap().is_some());
    }
}
