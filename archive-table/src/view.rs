//! Render snapshot of a table.
//!
//! A [`TableView`] is everything a renderer needs for one frame: the visible
//! headers, the rows of the current page, the select-all checkbox, the
//! pagination strip and the toolbar. It owns its data, so it can be handed
//! to a renderer without holding the table lock.

use std::fmt;

use crate::item::{Alignment, RowId};
use crate::state::SortDirection;

/// Tri-state of the "select all on page" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    /// Some but not all page rows are selected.
    Indeterminate,
    Checked,
}

/// One visible column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub id: String,
    pub title: String,
    pub sortable: bool,
    /// Active sort direction of this column, if any.
    pub sort: Option<SortDirection>,
    pub width: Option<u16>,
    pub align: Alignment,
}

impl HeaderCell {
    /// Header text with a sort indicator.
    pub fn label(&self) -> String {
        match self.sort {
            Some(SortDirection::Ascending) => format!("{} ▲", self.title),
            Some(SortDirection::Descending) => format!("{} ▼", self.title),
            None => self.title.clone(),
        }
    }
}

/// One rendered body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub id: RowId,
    /// Checkbox state; `None` when selection is disabled.
    pub selected: Option<bool>,
    /// Stringified cells, one per visible column.
    pub cells: Vec<String>,
}

/// Numbers behind "Showing X to Y of Z".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSummary {
    /// 1-based position of the first rendered row, 0 when nothing is rendered.
    pub from: usize,
    /// 1-based position of the last rendered row, 0 when nothing is rendered.
    pub to: usize,
    /// Number of rows after filtering.
    pub total: usize,
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} to {} of {}", self.from, self.to, self.total)
    }
}

/// The pagination control strip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationView {
    pub summary: PageSummary,
    /// 0-based current page.
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// 1-based page-number buttons.
    pub pages: Vec<usize>,
    pub can_previous: bool,
    pub can_next: bool,
}

/// Entry of the column visibility menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToggle {
    pub id: String,
    pub header: String,
    pub visible: bool,
}

/// Filter input and column menu above the table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolbarView {
    /// Current global filter; `None` when filters are hidden.
    pub global_filter: Option<String>,
    /// Hideable columns; empty when the column toggle is hidden.
    pub column_toggles: Vec<ColumnToggle>,
}

/// Snapshot of a table for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<ViewRow>,
    /// The filtered row set is empty; render a single "No results" row.
    pub empty: bool,
    /// Select-all checkbox; `None` when selection is disabled.
    pub select_all: Option<CheckState>,
    /// Pagination strip; `None` when pagination is hidden.
    pub pagination: Option<PaginationView>,
    pub toolbar: ToolbarView,
    /// Number of selected rows present in the data.
    pub selected_count: usize,
}

impl TableView {
    /// Find a rendered row by id.
    pub fn row(&self, id: &str) -> Option<&ViewRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// IDs of the rendered rows, in display order.
    pub fn row_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.id.as_str()).collect()
    }
}
