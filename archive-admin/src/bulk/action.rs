//! Bulk actions and where they apply

use std::fmt;

use archive_lib::api::BulkApi;
use archive_lib::cache::QueryKey;
use archive_lib::error::Error;
use archive_lib::error::ValidationError;
use archive_lib::model::AccessLevel;
use archive_lib::model::CollectionId;
use archive_lib::model::Role;
use archive_lib::model::TenantId;

/// The list a controller acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkScope {
    /// Documents of one tenant.
    Documents(TenantId),
    /// Users across tenants.
    Users,
}

impl BulkScope {
    /// The row-data query refreshed after a successful action.
    pub fn query_key(&self) -> QueryKey {
        match self {
            Self::Documents(tenant) => QueryKey::Documents(tenant.clone()),
            Self::Users => QueryKey::Users,
        }
    }

    /// Singular noun for rows of this scope.
    fn noun(&self) -> &'static str {
        match self {
            Self::Documents(_) => "document",
            Self::Users => "user",
        }
    }
}

impl fmt::Display for BulkScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Documents(tenant) => write!(f, "documents of {}", tenant),
            Self::Users => f.write_str("users"),
        }
    }
}

/// A mutation applied to every selected row in one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    DeleteDocuments,
    UpdateAccess(AccessLevel),
    AssignCollections(Vec<CollectionId>),
    UpdateRoles(Role),
    DeleteUsers,
}

impl BulkAction {
    /// Every document action, for building toolbars.
    pub fn document_actions() -> Vec<BulkAction> {
        let mut actions = vec![Self::DeleteDocuments];
        actions.extend(AccessLevel::ALL.iter().copied().map(Self::UpdateAccess));
        actions
    }

    /// Every user action, for building toolbars.
    pub fn user_actions() -> Vec<BulkAction> {
        let mut actions: Vec<_> = Role::ALL.iter().copied().map(Self::UpdateRoles).collect();
        actions.push(Self::DeleteUsers);
        actions
    }

    /// Short label for buttons and menus.
    pub fn label(&self) -> String {
        match self {
            Self::DeleteDocuments | Self::DeleteUsers => "Delete".to_string(),
            Self::UpdateAccess(access) => format!("Set access: {}", access.label()),
            Self::AssignCollections(_) => "Add to collections".to_string(),
            Self::UpdateRoles(role) => format!("Set role: {}", role.label()),
        }
    }

    /// Check if this action can run against `scope`.
    pub fn applies_to(&self, scope: &BulkScope) -> bool {
        match self {
            Self::DeleteDocuments | Self::UpdateAccess(_) | Self::AssignCollections(_) => {
                matches!(scope, BulkScope::Documents(_))
            }
            Self::UpdateRoles(_) | Self::DeleteUsers => matches!(scope, BulkScope::Users),
        }
    }

    /// Question shown in the confirmation dialog.
    pub fn confirm_message(&self, scope: &BulkScope, count: usize) -> String {
        let rows = counted(count, scope.noun());
        match self {
            Self::DeleteDocuments | Self::DeleteUsers => {
                format!("Delete {}? This cannot be undone.", rows)
            }
            Self::UpdateAccess(access) => {
                format!("Set access of {} to {}?", rows, access.label())
            }
            Self::AssignCollections(collections) => format!(
                "Add {} to {}?",
                rows,
                counted(collections.len(), "collection")
            ),
            Self::UpdateRoles(role) => format!("Change the role of {} to {}?", rows, role.label()),
        }
    }

    /// Notification text after the server applied the action to `count` rows.
    pub fn success_message(&self, scope: &BulkScope, count: u64) -> String {
        let rows = counted(count as usize, scope.noun());
        match self {
            Self::DeleteDocuments | Self::DeleteUsers => format!("Deleted {}", rows),
            Self::UpdateAccess(access) => format!("Set access to {} for {}", access.label(), rows),
            Self::AssignCollections(_) => format!("Added {} to collections", rows),
            Self::UpdateRoles(role) => format!("Changed role to {} for {}", role.label(), rows),
        }
    }

    /// Sends the action as one request. Returns the number of rows affected.
    ///
    /// User endpoints return no count, so the number of ids sent is reported.
    /// A document action against [`BulkScope::Users`] fails with
    /// [`ValidationError::EmptyTenant`].
    pub async fn dispatch(
        &self,
        api: &dyn BulkApi,
        scope: &BulkScope,
        ids: &[String],
    ) -> Result<u64, Error> {
        let tenant = match scope {
            BulkScope::Documents(tenant) => Some(tenant),
            BulkScope::Users => None,
        };
        match (self, tenant) {
            (Self::DeleteDocuments, Some(tenant)) => api.bulk_delete(tenant, ids).await,
            (Self::UpdateAccess(access), Some(tenant)) => {
                api.bulk_update_access(tenant, ids, *access).await
            }
            (Self::AssignCollections(collections), Some(tenant)) => {
                api.bulk_assign_to_collections(tenant, ids, collections).await
            }
            (Self::DeleteDocuments | Self::UpdateAccess(_) | Self::AssignCollections(_), None) => {
                Err(ValidationError::EmptyTenant.into())
            }
            (Self::UpdateRoles(role), _) => {
                api.bulk_update_roles(ids, *role).await?;
                Ok(ids.len() as u64)
            }
            (Self::DeleteUsers, _) => {
                api.bulk_delete_users(ids).await?;
                Ok(ids.len() as u64)
            }
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// `"1 document"`, `"3 documents"`.
fn counted(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_rules() {
        let docs = BulkScope::Documents(TenantId::new("uni"));
        assert!(BulkAction::DeleteDocuments.applies_to(&docs));
        assert!(!BulkAction::DeleteUsers.applies_to(&docs));
        assert!(BulkAction::UpdateRoles(Role::Admin).applies_to(&BulkScope::Users));
        assert!(!BulkAction::UpdateAccess(AccessLevel::Open).applies_to(&BulkScope::Users));
    }

    #[test]
    fn test_messages_name_count_and_target() {
        let docs = BulkScope::Documents(TenantId::new("uni"));
        let action = BulkAction::UpdateAccess(AccessLevel::Restricted);
        assert_eq!(
            action.confirm_message(&docs, 2),
            "Set access of 2 documents to Restricted?"
        );
        assert_eq!(
            BulkAction::DeleteDocuments.success_message(&docs, 1),
            "Deleted 1 document"
        );
        assert_eq!(
            BulkAction::UpdateRoles(Role::Reviewer).confirm_message(&BulkScope::Users, 3),
            "Change the role of 3 users to Reviewer?"
        );
    }

    #[test]
    fn test_action_lists() {
        assert!(
            BulkAction::document_actions()
                .iter()
                .all(|a| a.applies_to(&BulkScope::Documents(TenantId::new("t"))))
        );
        assert!(
            BulkAction::user_actions()
                .iter()
                .all(|a| a.applies_to(&BulkScope::Users))
        );
    }

    #[test]
    fn test_query_key() {
        assert_eq!(
            BulkScope::Documents(TenantId::new("uni")).query_key(),
            QueryKey::documents("uni")
        );
        assert_eq!(BulkScope::Users.query_key(), QueryKey::Users);
    }
}
