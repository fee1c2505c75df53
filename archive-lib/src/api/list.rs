//! Row-data list endpoints

use async_trait::async_trait;
use log::debug;

use crate::ArchiveClient;
use crate::error::Error;
use crate::error::ValidationError;
use crate::model::Document;
use crate::model::ListBody;
use crate::model::TenantId;
use crate::model::User;

/// Fetches the rows behind the admin list views.
#[async_trait]
pub trait ListApi: Send + Sync {
    /// All documents of a tenant.
    async fn list_documents(&self, tenant: &TenantId) -> Result<Vec<Document>, Error>;

    /// All users.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}

#[async_trait]
impl ListApi for ArchiveClient {
    async fn list_documents(&self, tenant: &TenantId) -> Result<Vec<Document>, Error> {
        if tenant.is_blank() {
            return Err(ValidationError::EmptyTenant.into());
        }
        let path = format!(
            "/api/tenants/{}/documents",
            urlencoding::encode(tenant.as_str())
        );
        let body: ListBody<Document> = self.get_json(&path).await?;
        let documents = body.into_vec();
        debug!("Fetched {} documents for {}", documents.len(), tenant);
        Ok(documents)
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let body: ListBody<User> = self.get_json("/api/users").await?;
        let users = body.into_vec();
        debug!("Fetched {} users", users.len());
        Ok(users)
    }
}
