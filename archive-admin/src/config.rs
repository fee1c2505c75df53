//! Admin configuration stored in settings

use std::str::FromStr;
use std::time::Duration;

use archive_lib::ArchiveClient;
use archive_lib::auth::TokenProvider;
use archive_lib::cache::CacheConfig;
use archive_lib::error::ApiError;
use archive_lib::model::TenantId;
use archive_table::DEFAULT_MAX_PAGE_SIZE;
use archive_table::DEFAULT_PAGE_SIZE;
use archive_table::TableOptions;
use log::warn;
use simplelog::LevelFilter;

use crate::settings::SettingsError;
use crate::settings::SettingsProvider;

/// Prefix of every key written by [`AdminConfig`].
pub const CONFIG_PREFIX: &str = "admin.";

const API_URL: &str = "admin.api_url";
const DEFAULT_TENANT: &str = "admin.default_tenant";
const PAGE_SIZE: &str = "admin.page_size";
const MAX_PAGE_SIZE: &str = "admin.max_page_size";
const REQUEST_TIMEOUT: &str = "admin.request_timeout_secs";
const CACHE_TTL: &str = "admin.cache_ttl_secs";
const LOG_LEVEL: &str = "admin.log_level";

/// Runtime configuration of the admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Base URL of the archive API.
    pub api_url: String,
    /// Tenant opened on start.
    pub default_tenant: Option<TenantId>,
    pub page_size: usize,
    pub max_page_size: usize,
    pub request_timeout_secs: u64,
    /// Lifetime of cached row data. `0` disables the cache.
    pub cache_ttl_secs: u64,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            default_tenant: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            request_timeout_secs: 30,
            cache_ttl_secs: 300,
            log_level: "info".to_string(),
        }
    }
}

impl AdminConfig {
    /// Reads the configuration, using defaults for unset keys.
    pub async fn load(settings: &SettingsProvider) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        Ok(Self {
            api_url: settings.get_or(API_URL, defaults.api_url).await?,
            default_tenant: settings.get(DEFAULT_TENANT).await?,
            page_size: settings.get_or(PAGE_SIZE, defaults.page_size as u64).await? as usize,
            max_page_size: settings
                .get_or(MAX_PAGE_SIZE, defaults.max_page_size as u64)
                .await? as usize,
            request_timeout_secs: settings
                .get_or(REQUEST_TIMEOUT, defaults.request_timeout_secs)
                .await?,
            cache_ttl_secs: settings.get_or(CACHE_TTL, defaults.cache_ttl_secs).await?,
            log_level: settings.get_or(LOG_LEVEL, defaults.log_level).await?,
        })
    }

    /// Writes every field.
    pub async fn save(&self, settings: &SettingsProvider) -> Result<(), SettingsError> {
        settings.set(API_URL, &self.api_url).await?;
        match &self.default_tenant {
            Some(tenant) => settings.set(DEFAULT_TENANT, tenant).await?,
            None => settings.delete(DEFAULT_TENANT).await?,
        }
        settings.set(PAGE_SIZE, &(self.page_size as u64)).await?;
        settings.set(MAX_PAGE_SIZE, &(self.max_page_size as u64)).await?;
        settings.set(REQUEST_TIMEOUT, &self.request_timeout_secs).await?;
        settings.set(CACHE_TTL, &self.cache_ttl_secs).await?;
        settings.set(LOG_LEVEL, &self.log_level).await?;
        Ok(())
    }

    /// Removes every stored key so the next load returns defaults.
    pub async fn reset(settings: &SettingsProvider) -> Result<(), SettingsError> {
        settings.delete_prefix(CONFIG_PREFIX).await?;
        Ok(())
    }

    /// Options for admin tables: selectable rows with the configured paging.
    pub fn table_options(&self) -> TableOptions {
        TableOptions::default()
            .with_selection()
            .page_size(self.page_size)
            .max_page_size(self.max_page_size)
    }

    pub fn cache_config(&self) -> CacheConfig {
        if self.cache_ttl_secs == 0 {
            CacheConfig::no_cache()
        } else {
            CacheConfig::default().with_list_ttl(Duration::from_secs(self.cache_ttl_secs))
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configured log level, `Info` if unrecognised.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or_else(|_| {
            warn!("Unknown log level {:?}, using info", self.log_level);
            LevelFilter::Info
        })
    }

    /// Builds an API client for the configured URL.
    pub fn client<P: TokenProvider + 'static>(
        &self,
        token_provider: P,
    ) -> Result<ArchiveClient, ApiError> {
        ArchiveClient::builder()
            .url(self.api_url.as_str())
            .token_provider(token_provider)
            .timeout(self.request_timeout())
            .build()
    }
}
