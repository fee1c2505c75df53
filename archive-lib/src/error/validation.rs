//! Validation error types

/// A request rejected on the client before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A bulk call was given no ids.
    #[error("No ids given")]
    EmptyIds,

    /// An id in a bulk call is empty.
    #[error("Empty id at position {index}")]
    BlankId { index: usize },

    /// A tenant-scoped call was given an empty tenant id.
    #[error("Tenant id must not be empty")]
    EmptyTenant,

    /// A collection assignment named no collections.
    #[error("No collections given")]
    EmptyCollections,
}

/// Checks the id list of a bulk call.
pub(crate) fn check_ids(ids: &[String]) -> Result<(), ValidationError> {
    if ids.is_empty() {
        return Err(ValidationError::EmptyIds);
    }
    match ids.iter().position(|id| id.trim().is_empty()) {
        Some(index) => Err(ValidationError::BlankId { index }),
        None => Ok(()),
    }
}
