//! Bulk endpoint request and response bodies

use serde::Deserialize;
use serde::Serialize;

use super::AccessLevel;
use super::CollectionId;
use super::Role;

/// `{"ids": [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct IdsRequest<'a> {
    pub ids: &'a [String],
}

/// `{"ids": [...], "access": "open"}`
#[derive(Debug, Clone, Serialize)]
pub struct AccessRequest<'a> {
    pub ids: &'a [String],
    pub access: AccessLevel,
}

/// `{"ids": [...], "collection_ids": [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct CollectionsRequest<'a> {
    pub ids: &'a [String],
    pub collection_ids: &'a [CollectionId],
}

/// `{"ids": [...], "role": "reviewer"}`
#[derive(Debug, Clone, Serialize)]
pub struct RoleRequest<'a> {
    pub ids: &'a [String],
    pub role: Role,
}

/// Response of the document bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// Response of the document access update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UpdatedResponse {
    pub updated: u64,
}

/// Response of the collection assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AssignedResponse {
    pub assigned: u64,
}

/// A list endpoint body: either a bare array or `{"data": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_request_body() {
        let ids = vec!["d1".to_string(), "d2".to_string()];
        let collections = vec![CollectionId::new("c9")];
        let body = serde_json::to_value(CollectionsRequest {
            ids: &ids,
            collection_ids: &collections,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"ids": ["d1", "d2"], "collection_ids": ["c9"]})
        );
    }

    #[test]
    fn test_list_body_shapes() {
        let bare: ListBody<u8> = serde_json::from_str("[1,2]").unwrap();
        let wrapped: ListBody<u8> = serde_json::from_str(r#"{"data":[3]}"#).unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);
        assert_eq!(wrapped.into_vec(), vec![3]);
    }
}
