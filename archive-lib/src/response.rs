//! Fetched data tagged with its cache provenance

use chrono::DateTime;
use chrono::Utc;

/// Where a [`Response`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The cache was bypassed.
    None,
    /// Fetched now and stored until `expires_at`.
    Miss {
        cached_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
    /// Served from an entry stored at `cached_at`.
    Hit {
        cached_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
}

impl CacheStatus {
    fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match *self {
            Self::None => None,
            Self::Miss {
                cached_at,
                expires_at,
            }
            | Self::Hit {
                cached_at,
                expires_at,
            } => Some((cached_at, expires_at)),
        }
    }
}

/// Result of [`QueryCache::fetch`](crate::cache::QueryCache::fetch).
///
/// ```ignore
/// let users = cache.fetch(&QueryKey::Users, || client.list_users()).await?;
/// if users.is_cached() {
///     debug!("users cached at {:?}", users.cached_at());
/// }
/// table.set_rows(users.into_inner())?;
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    data: T,
    pub cache: CacheStatus,
}

impl<T> Response<T> {
    /// Data that never touched the cache.
    pub fn new(data: T) -> Self {
        Self {
            data,
            cache: CacheStatus::None,
        }
    }

    /// Data just fetched and stored.
    pub fn cache_miss(data: T, cached_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        let cache = CacheStatus::Miss {
            cached_at,
            expires_at,
        };
        Self { data, cache }
    }

    /// Data read back from the cache.
    pub fn cache_hit(data: T, cached_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        let cache = CacheStatus::Hit {
            cached_at,
            expires_at,
        };
        Self { data, cache }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self.cache, CacheStatus::Hit { .. })
    }

    /// Check if the data came from the API on this call.
    pub fn is_fresh(&self) -> bool {
        !self.is_cached()
    }

    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.cache.window().map(|(cached_at, _)| cached_at)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.cache.window().map(|(_, expires_at)| expires_at)
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance() {
        let now = Utc::now();
        let later = now + chrono::Duration::seconds(30);

        let plain = Response::new(1);
        assert!(plain.is_fresh());
        assert_eq!(plain.cached_at(), None);

        let hit = Response::cache_hit(2, now, later);
        assert!(hit.is_cached());
        assert_eq!(hit.cached_at(), Some(now));
        assert_eq!(hit.expires_at(), Some(later));

        let miss = Response::cache_miss(3, now, later);
        assert!(miss.is_fresh());
        assert_eq!(miss.into_inner(), 3);
    }
}
