//! SQLite settings backend

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;

use super::SettingsBackend;
use super::SettingsError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS admin_settings (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Settings stored in one SQLite table, with reads cached in a [`DashMap`].
///
/// The cache is write-through, so it is only valid while this backend is the
/// sole writer of the database.
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Opens (or creates) the database at `path`. `":memory:"` opens a
    /// private in-memory database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let client = ClientBuilder::new().path(path).open().await?;
        client.conn(|conn| conn.execute(SCHEMA, [])).await?;
        debug!("Opened settings database {}", path.display());

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let owned = key.to_string();
        let value = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM admin_settings WHERE key = ?1")?;
                let mut rows = stmt.query([&owned])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, Vec<u8>>(0)?)),
                    None => Ok(None),
                }
            })
            .await?;

        if let Some(value) = &value {
            self.cache.insert(key.to_string(), value.clone());
        }
        Ok(value)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        let owned = key.to_string();
        let stored = value.clone();
        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO admin_settings (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE
                     SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
                    rusqlite::params![&owned, &stored],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        let owned = key.to_string();
        self.client
            .conn(move |conn| conn.execute("DELETE FROM admin_settings WHERE key = ?1", [&owned]))
            .await?;

        self.cache.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        // substr instead of LIKE so `_` and `%` in keys match literally.
        let prefix = prefix.to_string();
        let keys = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT key FROM admin_settings WHERE substr(key, 1, length(?1)) = ?1",
                )?;
                let rows = stmt.query_map([&prefix], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let backend = SqliteBackend::open(":memory:").await.unwrap();
        backend.set_bytes("admin.page_size", vec![1, 2]).await.unwrap();
        backend.set_bytes("admin.page_size", vec![3]).await.unwrap();
        assert_eq!(backend.get_bytes("admin.page_size").await.unwrap(), Some(vec![3]));

        backend.delete("admin.page_size").await.unwrap();
        assert_eq!(backend.get_bytes("admin.page_size").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_prefix_is_literal() {
        let backend = SqliteBackend::open(":memory:").await.unwrap();
        backend.set_bytes("admin_x", vec![0]).await.unwrap();
        backend.set_bytes("adminXx", vec![0]).await.unwrap();
        let keys = backend.keys_with_prefix("admin_").await.unwrap();
        assert_eq!(keys, vec!["admin_x".to_string()]);
    }
}
