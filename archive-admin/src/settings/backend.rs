//! Settings storage trait

use async_trait::async_trait;

use super::SettingsError;

/// Raw byte storage behind [`SettingsProvider`](super::SettingsProvider).
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError>;

    /// Inserts or replaces `key`.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError>;

    /// Removes `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<(), SettingsError>;

    /// Keys starting with `prefix`, in no particular order.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError>;
}
