//! Row selection state.
//!
//! Selection is keyed by row ID, so it stays stable while rows are
//! filtered, sorted, paged, or replaced by a fresh copy of the same data.

use std::collections::{HashMap, HashSet};

use crate::item::RowId;

/// Raw selection map: `true` means selected.
pub type RowSelection = HashMap<RowId, bool>;

/// ID-based selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: RowSelection,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from a raw map. `false` entries are kept as-is.
    pub fn from_map(entries: RowSelection) -> Self {
        Self { entries }
    }

    /// The raw selection map.
    pub fn as_map(&self) -> &RowSelection {
        &self.entries
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.entries.get(id).copied().unwrap_or(false)
    }

    /// Get the number of selected IDs.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|&&selected| selected).count()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        !self.entries.values().any(|&selected| selected)
    }

    /// Get all selected IDs (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<RowId> {
        let mut ids: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Set the selection state of one ID. Returns true if it changed.
    pub fn set(&mut self, id: &str, selected: bool) -> bool {
        let was = self.is_selected(id);
        if selected {
            self.entries.insert(id.to_string(), true);
        } else {
            self.entries.remove(id);
        }
        was != selected
    }

    /// Flip the selection state of one ID. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_selected(id);
        self.set(id, next);
        next
    }

    /// Select every ID in `ids`. Returns the IDs that were newly selected.
    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> Vec<RowId> {
        ids.into_iter()
            .filter(|id| self.set(id, true))
            .map(str::to_string)
            .collect()
    }

    /// Deselect every ID in `ids`. Returns the IDs that were deselected.
    pub fn deselect_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> Vec<RowId> {
        ids.into_iter()
            .filter(|id| self.set(id, false))
            .map(str::to_string)
            .collect()
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<RowId> {
        let removed = self.selected();
        self.entries.clear();
        removed
    }

    /// Drop entries whose ID is not in `known`.
    /// Returns the selected IDs that were pruned.
    pub fn retain_known(&mut self, known: &HashSet<&str>) -> Vec<RowId> {
        let mut pruned = Vec::new();
        self.entries.retain(|id, selected| {
            let keep = known.contains(id.as_str());
            if !keep && *selected {
                pruned.push(id.clone());
            }
            keep
        });
        pruned.sort();
        pruned
    }
}
