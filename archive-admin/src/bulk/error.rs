//! Bulk action error types

/// Reasons a bulk action cannot be opened or confirmed.
///
/// These never reach the server. API failures are reported to the user as
/// notifications instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BulkError {
    /// Nothing is selected.
    #[error("No rows selected")]
    EmptySelection,

    /// A request is already in flight.
    #[error("A bulk action is already running")]
    Busy,

    /// `confirm` was called with no open confirmation.
    #[error("No bulk action is awaiting confirmation")]
    NoConfirmation,

    /// The action does not apply to this list.
    #[error("{action} is not available for {scope}")]
    UnsupportedAction { action: String, scope: String },

    /// Adding to collections with no collection chosen.
    #[error("No collections chosen")]
    NoCollections,
}
