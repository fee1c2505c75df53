//! Document and user records

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::AccessLevel;
use super::CollectionId;
use super::Role;
use super::TenantId;

/// Review status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Published,
    Rejected,
}

impl DocumentStatus {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under review",
            Self::Published => "Published",
            Self::Rejected => "Rejected",
        }
    }
}

/// A document (thesis, article, dataset) held by a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub collection_id: Option<CollectionId>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub access: AccessLevel,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_defaults() {
        let doc: Document =
            serde_json::from_str(r#"{"id":"d1","title":"Rivers","author":"Marta"}"#).unwrap();
        assert_eq!(doc.access, AccessLevel::Open);
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert!(doc.collection_id.is_none());
    }

    #[test]
    fn test_user_from_api() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","name":"Ana","email":"ana@uni.edu","role":"reviewer","tenant_id":"uni","created_at":"2024-02-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Reviewer);
        assert_eq!(user.tenant_id, Some(TenantId::new("uni")));
        assert!(user.created_at.is_some());
    }
}
