//! Bulk action entries shown above a table

use archive_table::RowId;

use super::BulkAction;
use super::BulkActionController;

/// One button or menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarEntry {
    pub action: BulkAction,
    pub label: String,
    /// `false` when nothing is selected or a request is in flight.
    pub enabled: bool,
}

/// Bulk actions for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkToolbar {
    /// `"3 selected"`, or empty with no selection.
    pub selection_label: String,
    pub entries: Vec<ToolbarEntry>,
}

impl BulkToolbar {
    /// Builds the toolbar for `selection`, skipping actions outside the
    /// controller's scope.
    pub fn new(
        controller: &BulkActionController,
        actions: impl IntoIterator<Item = BulkAction>,
        selection: &[RowId],
    ) -> Self {
        let enabled = controller.is_enabled(selection);
        let entries = actions
            .into_iter()
            .filter(|action| action.applies_to(controller.scope()))
            .map(|action| ToolbarEntry {
                label: action.label(),
                action,
                enabled,
            })
            .collect();
        let selection_label = if selection.is_empty() {
            String::new()
        } else {
            format!("{} selected", selection.len())
        };
        Self {
            selection_label,
            entries,
        }
    }

    /// Check if any entry can be used.
    pub fn any_enabled(&self) -> bool {
        self.entries.iter().any(|entry| entry.enabled)
    }

    /// Entry for `action`, if shown.
    pub fn entry(&self, action: &BulkAction) -> Option<&ToolbarEntry> {
        self.entries.iter().find(|entry| &entry.action == action)
    }
}
