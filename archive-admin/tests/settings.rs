//! Tests for persisted settings and the admin configuration.

use std::path::PathBuf;
use std::time::Duration;

use archive_admin::AdminConfig;
use archive_admin::settings::SettingsProvider;
use archive_admin::settings::SqliteBackend;
use archive_lib::auth::StaticTokenProvider;
use archive_lib::error::ApiError;
use archive_lib::model::TenantId;
use log::LevelFilter;

fn scratch_db(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("archive-admin-settings-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.db", name));
    let _ = std::fs::remove_file(&path);
    path
}

#[tokio::test]
async fn test_sqlite_settings_survive_reopen() {
    let path = scratch_db("reopen");
    {
        let settings = SettingsProvider::new(SqliteBackend::open(&path).await.unwrap());
        settings.set("admin.page_size", &25u64).await.unwrap();
    }

    let settings = SettingsProvider::new(SqliteBackend::open(&path).await.unwrap());
    assert_eq!(
        settings.get::<u64>("admin.page_size").await.unwrap(),
        Some(25)
    );
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_config_defaults_when_empty() {
    let settings = SettingsProvider::in_memory();
    let config = AdminConfig::load(&settings).await.unwrap();
    assert_eq!(config, AdminConfig::default());
    assert_eq!(config.table_options().page_size, 10);
    assert!(config.table_options().show_selection);
}

#[tokio::test]
async fn test_config_save_load_reset() {
    let settings = SettingsProvider::new(SqliteBackend::open(":memory:").await.unwrap());
    let config = AdminConfig {
        api_url: "https://archive.example.edu".to_string(),
        default_tenant: Some(TenantId::new("uni")),
        page_size: 25,
        cache_ttl_secs: 0,
        log_level: "debug".to_string(),
        ..Default::default()
    };
    config.save(&settings).await.unwrap();
    assert_eq!(AdminConfig::load(&settings).await.unwrap(), config);

    AdminConfig::reset(&settings).await.unwrap();
    assert_eq!(
        AdminConfig::load(&settings).await.unwrap(),
        AdminConfig::default()
    );
}

#[test]
fn test_derived_settings() {
    let config = AdminConfig {
        page_size: 500,
        max_page_size: 50,
        cache_ttl_secs: 0,
        request_timeout_secs: 7,
        log_level: "loud".to_string(),
        ..Default::default()
    };
    assert!(config.cache_config().is_disabled());
    assert_eq!(config.request_timeout(), Duration::from_secs(7));
    assert_eq!(config.level_filter(), LevelFilter::Info);

    let debug = AdminConfig {
        log_level: "debug".to_string(),
        ..Default::default()
    };
    assert_eq!(debug.level_filter(), LevelFilter::Debug);
    assert!(!debug.cache_config().is_disabled());
}

#[test]
fn test_client_from_config() {
    let config = AdminConfig::default();
    let client = config.client(StaticTokenProvider::new("secret")).unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080");
    assert_eq!(client.timeout(), Some(Duration::from_secs(30)));

    let broken = AdminConfig {
        api_url: "not a url".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        broken.client(StaticTokenProvider::new("secret")),
        Err(ApiError::InvalidUrl(_))
    ));
}
