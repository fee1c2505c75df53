//! Row-data queries behind the admin lists

use std::sync::Arc;

use archive_lib::api::ListApi;
use archive_lib::cache::QueryKey;
use archive_lib::error::Error;
use archive_lib::model::Document;
use archive_lib::model::TenantId;
use archive_lib::model::User;
use async_trait::async_trait;

/// Loads every row of one list.
#[async_trait]
pub trait RowQuery<T>: Send + Sync {
    /// Cache key of the result.
    fn key(&self) -> QueryKey;

    async fn fetch(&self) -> Result<Vec<T>, Error>;
}

/// Documents of one tenant.
#[derive(Clone)]
pub struct DocumentsQuery {
    api: Arc<dyn ListApi>,
    tenant: TenantId,
}

impl DocumentsQuery {
    pub fn new(api: Arc<dyn ListApi>, tenant: TenantId) -> Self {
        Self { api, tenant }
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }
}

#[async_trait]
impl RowQuery<Document> for DocumentsQuery {
    fn key(&self) -> QueryKey {
        QueryKey::Documents(self.tenant.clone())
    }

    async fn fetch(&self) -> Result<Vec<Document>, Error> {
        self.api.list_documents(&self.tenant).await
    }
}

/// All users.
#[derive(Clone)]
pub struct UsersQuery {
    api: Arc<dyn ListApi>,
}

impl UsersQuery {
    pub fn new(api: Arc<dyn ListApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RowQuery<User> for UsersQuery {
    fn key(&self) -> QueryKey {
        QueryKey::Users
    }

    async fn fetch(&self) -> Result<Vec<User>, Error> {
        self.api.list_users().await
    }
}
