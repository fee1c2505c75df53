//! Bulk mutation endpoints

use async_trait::async_trait;
use log::info;

use crate::ArchiveClient;
use crate::error::Error;
use crate::error::ValidationError;
use crate::error::check_ids;
use crate::model::AccessLevel;
use crate::model::AccessRequest;
use crate::model::AssignedResponse;
use crate::model::CollectionId;
use crate::model::CollectionsRequest;
use crate::model::DeletedResponse;
use crate::model::IdsRequest;
use crate::model::Role;
use crate::model::RoleRequest;
use crate::model::TenantId;
use crate::model::UpdatedResponse;

/// Batched mutations over documents and users.
///
/// Every call sends the full id list in a single request. Empty id lists are
/// rejected with [`ValidationError::EmptyIds`] before anything is sent.
/// Returned counts come from the server and are informational; a failed
/// call says nothing about which ids, if any, were applied.
#[async_trait]
pub trait BulkApi: Send + Sync {
    /// Deletes documents. Returns the number deleted.
    async fn bulk_delete(&self, tenant: &TenantId, ids: &[String]) -> Result<u64, Error>;

    /// Sets the access level of documents. Returns the number updated.
    async fn bulk_update_access(
        &self,
        tenant: &TenantId,
        ids: &[String],
        access: AccessLevel,
    ) -> Result<u64, Error>;

    /// Adds documents to collections. Returns the number assigned.
    async fn bulk_assign_to_collections(
        &self,
        tenant: &TenantId,
        ids: &[String],
        collection_ids: &[CollectionId],
    ) -> Result<u64, Error>;

    /// Sets the role of users.
    async fn bulk_update_roles(&self, ids: &[String], role: Role) -> Result<(), Error>;

    /// Deletes users.
    async fn bulk_delete_users(&self, ids: &[String]) -> Result<(), Error>;
}

/// Path of a tenant-scoped document endpoint.
fn documents_path(tenant: &TenantId, action: &str) -> Result<String, ValidationError> {
    if tenant.is_blank() {
        return Err(ValidationError::EmptyTenant);
    }
    Ok(format!(
        "/api/tenants/{}/documents/{}",
        urlencoding::encode(tenant.as_str()),
        action
    ))
}

#[async_trait]
impl BulkApi for ArchiveClient {
    async fn bulk_delete(&self, tenant: &TenantId, ids: &[String]) -> Result<u64, Error> {
        check_ids(ids)?;
        let path = documents_path(tenant, "bulk-delete")?;
        let response: DeletedResponse = self.post_json(&path, &IdsRequest { ids }).await?;
        info!("Deleted {} of {} documents in {}", response.deleted, ids.len(), tenant);
        Ok(response.deleted)
    }

    async fn bulk_update_access(
        &self,
        tenant: &TenantId,
        ids: &[String],
        access: AccessLevel,
    ) -> Result<u64, Error> {
        check_ids(ids)?;
        let path = documents_path(tenant, "bulk-access")?;
        let response: UpdatedResponse = self
            .post_json(&path, &AccessRequest { ids, access })
            .await?;
        info!(
            "Set access {} on {} of {} documents in {}",
            access,
            response.updated,
            ids.len(),
            tenant
        );
        Ok(response.updated)
    }

    async fn bulk_assign_to_collections(
        &self,
        tenant: &TenantId,
        ids: &[String],
        collection_ids: &[CollectionId],
    ) -> Result<u64, Error> {
        check_ids(ids)?;
        if collection_ids.is_empty() {
            return Err(ValidationError::EmptyCollections.into());
        }
        let path = documents_path(tenant, "bulk-collections")?;
        let response: AssignedResponse = self
            .post_json(
                &path,
                &CollectionsRequest {
                    ids,
                    collection_ids,
                },
            )
            .await?;
        info!(
            "Assigned {} of {} documents to {} collections in {}",
            response.assigned,
            ids.len(),
            collection_ids.len(),
            tenant
        );
        Ok(response.assigned)
    }

    async fn bulk_update_roles(&self, ids: &[String], role: Role) -> Result<(), Error> {
        check_ids(ids)?;
        self.post_unit("/api/users/bulk-role", &RoleRequest { ids, role })
            .await?;
        info!("Set role {} on {} users", role, ids.len());
        Ok(())
    }

    async fn bulk_delete_users(&self, ids: &[String]) -> Result<(), Error> {
        check_ids(ids)?;
        self.post_unit("/api/users/bulk-delete", &IdsRequest { ids })
            .await?;
        info!("Deleted {} users", ids.len());
        Ok(())
    }
}
