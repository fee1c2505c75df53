//! Selection synchronizer.
//!
//! Turns the table's selection map into an ordered list of row IDs and
//! decides whether that list has to be reported to the owner. Reporting an
//! equal list again would make an owner that re-renders from the callback
//! loop forever, so emission is gated on a value comparison.

use std::sync::Arc;

use crate::item::{RowId, RowIdentity};
use crate::selection::Selection;

/// Callback receiving the selected row IDs.
pub type SelectionCallback = Arc<dyn Fn(&[RowId]) + Send + Sync>;

/// Tracks the last reported selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionSync {
    last_emitted: Vec<RowId>,
}

impl SelectionSync {
    /// Create a synchronizer that has reported an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected IDs that are present in `rows`, in data order.
    pub fn derive<T>(selection: &Selection, rows: &[T], identity: &RowIdentity<T>) -> Vec<RowId> {
        if selection.is_empty() {
            return Vec::new();
        }
        rows.iter()
            .map(|row| identity(row))
            .filter(|id| selection.is_selected(id))
            .collect()
    }

    /// Same as [`derive`](Self::derive) for precomputed row IDs.
    pub fn derive_from_ids(selection: &Selection, ids: &[RowId]) -> Vec<RowId> {
        if selection.is_empty() {
            return Vec::new();
        }
        ids.iter()
            .filter(|id| selection.is_selected(id))
            .cloned()
            .collect()
    }

    /// Record `next` and return it if it differs from the last reported list.
    pub fn sync(&mut self, next: Vec<RowId>) -> Option<Vec<RowId>> {
        if same_ids(&self.last_emitted, &next) {
            return None;
        }
        self.last_emitted = next.clone();
        Some(next)
    }

    /// The last reported list.
    pub fn last_emitted(&self) -> &[RowId] {
        &self.last_emitted
    }

    /// Forget the last reported list.
    pub fn reset(&mut self) {
        self.last_emitted.clear();
    }
}

/// Positional equality of two ID lists.
pub fn same_ids(a: &[RowId], b: &[RowId]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}
