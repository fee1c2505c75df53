//! Table error types

use crate::item::RowId;

/// Errors raised when a table is configured or fed incorrectly.
///
/// These are programmer errors: the column set or the identity function is
/// wrong. They are never caused by user interaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two columns share the same id.
    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),

    /// A column has an empty id.
    #[error("column id must not be empty")]
    EmptyColumnId,

    /// The identity function returned an empty id.
    #[error("row at index {index} has no id")]
    MissingRowId {
        /// Index of the row in the data set.
        index: usize,
    },

    /// Two rows of one data set share an id.
    #[error("duplicate row id {id:?} at index {index}")]
    DuplicateRowId {
        /// The repeated id.
        id: RowId,
        /// Index of the second occurrence.
        index: usize,
    },
}
