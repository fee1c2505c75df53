//! Persistent admin settings
//!
//! Values are bincode-encoded and stored under string keys in a
//! [`SettingsBackend`]. [`SettingsProvider`] adds the typing.

mod backend;
mod memory;
mod sqlite;

pub use backend::SettingsBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings database error: {0}")]
    Database(#[from] async_sqlite::Error),

    #[error("cannot encode setting {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: bincode::Error,
    },

    #[error("cannot decode setting {key}: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: bincode::Error,
    },
}

/// Typed settings over any backend. Clones share the backend.
///
/// # Example
///
/// ```ignore
/// let settings = SettingsProvider::new(SqliteBackend::open(paths.settings_db()).await?);
/// settings.set("admin.page_size", &25usize).await?;
/// let page_size: usize = settings.get_or("admin.page_size", 10).await?;
/// ```
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Settings that live only as long as the provider.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Reads `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        let Some(bytes) = self.backend.get_bytes(key).await? else {
            return Ok(None);
        };
        bincode::deserialize(&bytes)
            .map(Some)
            .map_err(|source| SettingsError::Deserialization {
                key: key.to_string(),
                source,
            })
    }

    /// Reads `key`, falling back to `default` when unset.
    pub async fn get_or<T: DeserializeOwned>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T, SettingsError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Writes `key`.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(|source| SettingsError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.backend.set_bytes(key, bytes).await
    }

    /// Removes `key`.
    pub async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        self.backend.delete(key).await
    }

    /// Keys starting with `prefix`, sorted.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        let mut keys = self.backend.keys_with_prefix(prefix).await?;
        keys.sort();
        Ok(keys)
    }

    /// Removes every key starting with `prefix`. Returns the number removed.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<usize, SettingsError> {
        let keys = self.backend.keys_with_prefix(prefix).await?;
        for key in &keys {
            self.backend.delete(key).await?;
        }
        Ok(keys.len())
    }
}

impl fmt::Debug for SettingsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsProvider").finish_non_exhaustive()
    }
}
