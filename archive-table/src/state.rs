//! Table engine state.
//!
//! The table owns its view state (sorting, filters, column visibility,
//! selection, pagination) and derives the rendered page from the injected
//! rows on every read: filter, then sort, then paginate. Rows are owned by
//! the caller and replaced wholesale with [`Table::set_rows`].

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{self, AtomicBool, AtomicUsize};
use std::sync::{Arc, RwLock};

use log::{debug, error};

use crate::error::TableError;
use crate::item::{CellValue, Column, RowId, RowIdentity};
use crate::selection::{RowSelection, Selection};
use crate::sync::{SelectionCallback, SelectionSync};
use crate::view::{
    CheckState, ColumnToggle, HeaderCell, PageSummary, PaginationView, TableView, ToolbarView,
    ViewRow,
};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Upper bound for the page size selector.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;
/// Number of page-number buttons in the pagination strip.
pub const DEFAULT_PAGE_BUTTONS: usize = 5;

/// Unique identifier for a Table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, atomic::Ordering::SeqCst))
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__table_{}", self.0)
    }
}

// =============================================================================
// Options
// =============================================================================

/// Feature flags and pagination defaults of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Show the global filter input.
    pub show_filters: bool,
    /// Show the column visibility menu.
    pub show_column_toggle: bool,
    /// Paginate rows and show the pagination strip.
    /// When off, every filtered row is rendered on a single page.
    pub show_pagination: bool,
    /// Render row checkboxes and report selection.
    pub show_selection: bool,
    /// Initial page size.
    pub page_size: usize,
    /// Largest page size the selector accepts.
    pub max_page_size: usize,
    /// Number of page-number buttons.
    pub page_buttons: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            show_filters: true,
            show_column_toggle: true,
            show_pagination: true,
            show_selection: false,
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            page_buttons: DEFAULT_PAGE_BUTTONS,
        }
    }
}

impl TableOptions {
    /// Enable row selection.
    pub fn with_selection(mut self) -> Self {
        self.show_selection = true;
        self
    }

    /// Render all rows on one page without a pagination strip.
    pub fn without_pagination(mut self) -> Self {
        self.show_pagination = false;
        self
    }

    /// Hide the global filter input.
    pub fn without_filters(mut self) -> Self {
        self.show_filters = false;
        self
    }

    /// Hide the column visibility menu.
    pub fn without_column_toggle(mut self) -> Self {
        self.show_column_toggle = false;
        self
    }

    /// Set the initial page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the largest page size.
    pub fn max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size;
        self
    }

    /// Clamp sizes into a usable range.
    fn normalized(mut self) -> Self {
        self.max_page_size = self.max_page_size.max(1);
        self.page_size = self.page_size.clamp(1, self.max_page_size);
        self.page_buttons = self.page_buttons.max(1);
        self
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSort {
    pub column_id: String,
    pub direction: SortDirection,
}

impl ColumnSort {
    /// Ascending sort on a column.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on a column.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Empty cells go last in both directions.
fn compare_cells(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => direction.apply(a.compare(b)),
    }
}

/// Page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 0-based page index, always within `[0, page_count - 1]`.
    pub page_index: usize,
    pub page_size: usize,
}

// =============================================================================
// TableInner
// =============================================================================

/// Internal state for the Table.
struct TableInner<T> {
    columns: Vec<Column<T>>,
    options: TableOptions,
    rows: Vec<T>,
    /// `row_ids[i]` is the id of `rows[i]`.
    row_ids: Vec<RowId>,
    row_index: HashMap<RowId, usize>,
    sorting: Vec<ColumnSort>,
    column_filters: HashMap<String, String>,
    global_filter: String,
    column_visibility: HashMap<String, bool>,
    selection: Selection,
    pagination: Pagination,
    sync: SelectionSync,
    on_selection_change: Option<SelectionCallback>,
}

impl<T> TableInner<T> {
    fn new(columns: Vec<Column<T>>, options: TableOptions) -> Self {
        let pagination = Pagination {
            page_index: 0,
            page_size: options.page_size,
        };
        Self {
            columns,
            options,
            rows: Vec::new(),
            row_ids: Vec::new(),
            row_index: HashMap::new(),
            sorting: Vec::new(),
            column_filters: HashMap::new(),
            global_filter: String::new(),
            column_visibility: HashMap::new(),
            selection: Selection::new(),
            pagination,
            sync: SelectionSync::new(),
            on_selection_change: None,
        }
    }

    fn column(&self, id: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|column| column.id == id)
    }

    fn is_visible(&self, column: &Column<T>) -> bool {
        !column.hideable || self.column_visibility.get(&column.id).copied().unwrap_or(true)
    }

    fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sorting
            .iter()
            .find(|sort| sort.column_id == column_id)
            .map(|sort| sort.direction)
    }

    // -------------------------------------------------------------------------
    // Derivation: filter -> sort -> paginate
    // -------------------------------------------------------------------------

    /// Indices of rows passing the global and column filters, in data order.
    fn filtered_indices(&self) -> Vec<usize> {
        let global = self.global_filter.trim().to_lowercase();
        let global_columns: Vec<&Column<T>> = if global.is_empty() {
            Vec::new()
        } else {
            self.columns
                .iter()
                .filter(|column| column.filterable && self.is_visible(column))
                .collect()
        };
        let column_filters: Vec<(&Column<T>, String)> = self
            .column_filters
            .iter()
            .filter_map(|(id, query)| {
                let query = query.trim().to_lowercase();
                if query.is_empty() {
                    return None;
                }
                self.column(id)
                    .filter(|column| column.filterable)
                    .map(|column| (column, query))
            })
            .collect();

        (0..self.rows.len())
            .filter(|&index| {
                let row = &self.rows[index];
                let global_ok = global.is_empty()
                    || global_columns
                        .iter()
                        .any(|column| column.cell(row).matches(&global));
                global_ok
                    && column_filters
                        .iter()
                        .all(|(column, query)| column.cell(row).matches(query))
            })
            .collect()
    }

    /// Filtered indices in display order.
    fn sorted_indices(&self) -> Vec<usize> {
        let indices = self.filtered_indices();
        let keys: Vec<(&Column<T>, SortDirection)> = self
            .sorting
            .iter()
            .filter_map(|sort| {
                self.column(&sort.column_id)
                    .filter(|column| column.sortable)
                    .map(|column| (column, sort.direction))
            })
            .collect();
        if keys.is_empty() {
            return indices;
        }

        let mut decorated: Vec<(usize, Vec<CellValue>)> = indices
            .into_iter()
            .map(|index| {
                let row = &self.rows[index];
                let values = keys.iter().map(|(column, _)| column.cell(row)).collect();
                (index, values)
            })
            .collect();

        // Stable: ties keep data order.
        decorated.sort_by(|(_, a), (_, b)| {
            keys.iter()
                .enumerate()
                .map(|(k, (_, direction))| compare_cells(&a[k], &b[k], *direction))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        decorated.into_iter().map(|(index, _)| index).collect()
    }

    fn page_count_for(&self, total: usize) -> usize {
        if !self.options.show_pagination {
            return 1;
        }
        total.div_ceil(self.pagination.page_size).max(1)
    }

    fn page_range(&self, total: usize) -> Range<usize> {
        if !self.options.show_pagination {
            return 0..total;
        }
        let start = self
            .pagination
            .page_index
            .saturating_mul(self.pagination.page_size)
            .min(total);
        let end = start.saturating_add(self.pagination.page_size).min(total);
        start..end
    }

    /// Indices of the rows on the current page, in display order.
    fn page_indices(&self) -> Vec<usize> {
        let sorted = self.sorted_indices();
        let range = self.page_range(sorted.len());
        sorted[range].to_vec()
    }

    fn page_ids(&self) -> Vec<&str> {
        self.page_indices()
            .into_iter()
            .map(|index| self.row_ids[index].as_str())
            .collect()
    }

    fn page_count(&self) -> usize {
        self.page_count_for(self.filtered_indices().len())
    }

    /// Keep the page index within `[0, page_count - 1]`.
    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.pagination.page_index > last {
            self.pagination.page_index = last;
        }
    }

    fn page_numbers(&self, page_count: usize) -> Vec<usize> {
        let window = self.options.page_buttons.min(page_count);
        let mut start = self.pagination.page_index.saturating_sub(window / 2);
        if start + window > page_count {
            start = page_count - window;
        }
        (start + 1..=start + window).collect()
    }

    fn summary(&self, range: &Range<usize>, total: usize) -> PageSummary {
        let rendered = range.len();
        if rendered == 0 {
            return PageSummary {
                from: 0,
                to: 0,
                total,
            };
        }
        PageSummary {
            from: range.start + 1,
            to: range.start + rendered,
            total,
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    fn selected_ids(&self) -> Vec<RowId> {
        SelectionSync::derive_from_ids(&self.selection, &self.row_ids)
    }

    fn page_check_state(&self, page_ids: &[&str]) -> CheckState {
        let selected = page_ids
            .iter()
            .filter(|id| self.selection.is_selected(id))
            .count();
        if selected == 0 {
            CheckState::Unchecked
        } else if selected == page_ids.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    /// Selection to report, if it changed since the last report.
    fn take_emission(&mut self) -> Option<(SelectionCallback, Vec<RowId>)> {
        if !self.options.show_selection {
            return None;
        }
        let callback = self.on_selection_change.clone()?;
        let next = self.selected_ids();
        self.sync.sync(next).map(|ids| (callback, ids))
    }

    // -------------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------------

    fn view(&self) -> TableView {
        let sorted = self.sorted_indices();
        let total = sorted.len();
        let range = self.page_range(total);
        let page = &sorted[range.clone()];
        let visible: Vec<&Column<T>> = self
            .columns
            .iter()
            .filter(|column| self.is_visible(column))
            .collect();
        let show_selection = self.options.show_selection;

        let headers = visible
            .iter()
            .map(|column| HeaderCell {
                id: column.id.clone(),
                title: column.header.clone(),
                sortable: column.sortable,
                sort: self.sort_direction(&column.id),
                width: column.width,
                align: column.align,
            })
            .collect();

        let rows = page
            .iter()
            .map(|&index| {
                let row = &self.rows[index];
                let id = &self.row_ids[index];
                ViewRow {
                    id: id.clone(),
                    selected: show_selection.then(|| self.selection.is_selected(id)),
                    cells: visible
                        .iter()
                        .map(|column| column.cell(row).to_string())
                        .collect(),
                }
            })
            .collect();

        let select_all = show_selection.then(|| {
            let page_ids: Vec<&str> = page
                .iter()
                .map(|&index| self.row_ids[index].as_str())
                .collect();
            self.page_check_state(&page_ids)
        });

        let pagination = self.options.show_pagination.then(|| {
            let page_count = self.page_count_for(total);
            PaginationView {
                summary: self.summary(&range, total),
                page_index: self.pagination.page_index,
                page_count,
                page_size: self.pagination.page_size,
                pages: self.page_numbers(page_count),
                can_previous: self.pagination.page_index > 0,
                can_next: self.pagination.page_index + 1 < page_count,
            }
        });

        let toolbar = ToolbarView {
            global_filter: self
                .options
                .show_filters
                .then(|| self.global_filter.clone()),
            column_toggles: if self.options.show_column_toggle {
                self.columns
                    .iter()
                    .filter(|column| column.hideable)
                    .map(|column| ColumnToggle {
                        id: column.id.clone(),
                        header: column.header.clone(),
                        visible: self.is_visible(column),
                    })
                    .collect()
            } else {
                Vec::new()
            },
        };

        TableView {
            headers,
            rows,
            empty: total == 0,
            select_all,
            pagination,
            toolbar,
            selected_count: if show_selection {
                self.selected_ids().len()
            } else {
                0
            },
        }
    }
}

fn validate_columns<T>(columns: &[Column<T>]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for column in columns {
        if column.id.is_empty() {
            return Err(TableError::EmptyColumnId);
        }
        if !seen.insert(column.id.as_str()) {
            return Err(TableError::DuplicateColumn(column.id.clone()));
        }
    }
    Ok(())
}

fn identify_rows<T>(rows: &[T], identity: &RowIdentity<T>) -> Result<Vec<RowId>, TableError> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut ids = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let id = identity(row);
        if id.is_empty() {
            return Err(TableError::MissingRowId { index });
        }
        if !seen.insert(id.clone()) {
            return Err(TableError::DuplicateRowId { id, index });
        }
        ids.push(id);
    }
    Ok(ids)
}

// =============================================================================
// Table
// =============================================================================

/// A sortable, filterable, paginated table with optional row selection.
///
/// `Table<T>` is a cheap handle: clones share the same state. Rows of type
/// `T` are identified by a caller-supplied [`RowIdentity`] and read through
/// column cell functions only, so the table knows nothing about row fields.
///
/// Selection changes are reported through
/// [`on_selection_change`](Table::on_selection_change) only when the ordered
/// list of selected IDs actually changed. The callback runs after the
/// internal lock is released, so it may call back into the table.
///
/// # Example
///
/// ```ignore
/// let table = Table::new(columns, identity(|d: &Document| d.id.clone()), TableOptions::default().with_selection())?;
/// table.on_selection_change(move |ids| page_state.set_selected(ids.to_vec()));
/// table.set_rows(documents)?;
/// table.set_global_filter("thesis");
/// let view = table.view();
/// ```
pub struct Table<T> {
    id: TableId,
    identity: RowIdentity<T>,
    inner: Arc<RwLock<TableInner<T>>>,
    dirty: Arc<AtomicBool>,
}

impl<T> Table<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty table.
    ///
    /// Fails if two columns share an id or a column id is empty.
    pub fn new(
        columns: Vec<Column<T>>,
        identity: RowIdentity<T>,
        options: TableOptions,
    ) -> Result<Self, TableError> {
        if let Err(e) = validate_columns(&columns) {
            error!("Invalid table columns: {}", e);
            return Err(e);
        }
        Ok(Self {
            id: TableId::new(),
            identity,
            inner: Arc::new(RwLock::new(TableInner::new(columns, options.normalized()))),
            dirty: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Create a table with initial rows.
    pub fn with_rows(
        columns: Vec<Column<T>>,
        identity: RowIdentity<T>,
        options: TableOptions,
        rows: Vec<T>,
    ) -> Result<Self, TableError> {
        let table = Self::new(columns, identity, options)?;
        table.set_rows(rows)?;
        Ok(table)
    }

    /// Get the unique ID.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Get the ID as a string.
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn read<R>(&self, f: impl FnOnce(&TableInner<T>) -> R) -> Option<R> {
        self.inner.read().ok().map(|guard| f(&*guard))
    }

    /// Mutate state, then report the selection if it changed.
    fn update<R>(&self, f: impl FnOnce(&mut TableInner<T>) -> R) -> Option<R> {
        let (result, emission) = {
            let mut guard = self.inner.write().ok()?;
            let result = f(&mut *guard);
            let emission = guard.take_emission();
            (result, emission)
        };
        self.dirty.store(true, atomic::Ordering::SeqCst);
        if let Some((callback, ids)) = emission {
            debug!("{}: selection changed ({} selected)", self.id, ids.len());
            callback(&ids);
        }
        Some(result)
    }

    /// Get the table options.
    pub fn options(&self) -> TableOptions {
        self.read(|g| g.options.clone()).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Get the column definitions.
    pub fn columns(&self) -> Vec<Column<T>> {
        self.read(|g| g.columns.clone()).unwrap_or_default()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.read(|g| g.columns.len()).unwrap_or(0)
    }

    /// Get the columns currently rendered.
    pub fn visible_columns(&self) -> Vec<Column<T>> {
        self.read(|g| {
            g.columns
                .iter()
                .filter(|column| g.is_visible(column))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }

    /// Check if a column is rendered. Unknown columns are not.
    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.read(|g| g.column(column_id).is_some_and(|column| g.is_visible(column)))
            .unwrap_or(false)
    }

    /// Show or hide a column. Returns true if visibility changed.
    ///
    /// Columns marked [`always_visible`](Column::always_visible) cannot be hidden.
    pub fn set_column_visibility(&self, column_id: &str, visible: bool) -> bool {
        self.update(|g| {
            let Some(column) = g.column(column_id) else {
                return false;
            };
            if !column.hideable || g.is_visible(column) == visible {
                return false;
            }
            g.column_visibility.insert(column_id.to_string(), visible);
            // Hiding a column shrinks the global filter surface.
            g.clamp_page();
            true
        })
        .unwrap_or(false)
    }

    /// Flip a column's visibility. Returns the new visibility.
    pub fn toggle_column_visibility(&self, column_id: &str) -> bool {
        let visible = self.is_column_visible(column_id);
        self.set_column_visibility(column_id, !visible);
        self.is_column_visible(column_id)
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Replace the data set.
    ///
    /// Every row must have a non-empty id unique within `rows`; otherwise the
    /// previous data is kept and an error is returned. Selected IDs whose row
    /// is gone are dropped silently, and the page index is clamped.
    pub fn set_rows(&self, rows: Vec<T>) -> Result<(), TableError> {
        let row_ids = match identify_rows(&rows, &self.identity) {
            Ok(ids) => ids,
            Err(e) => {
                error!("{}: rejected data set: {}", self.id, e);
                return Err(e);
            }
        };
        self.update(|g| {
            g.row_index = row_ids
                .iter()
                .enumerate()
                .map(|(index, id)| (id.clone(), index))
                .collect();
            let known: HashSet<&str> = row_ids.iter().map(String::as_str).collect();
            let pruned = g.selection.retain_known(&known);
            if !pruned.is_empty() {
                debug!("{}: pruned {} stale selected rows", self.id, pruned.len());
            }
            g.rows = rows;
            g.row_ids = row_ids;
            g.clamp_page();
        });
        Ok(())
    }

    /// Remove all rows.
    pub fn clear(&self) {
        self.update(|g| {
            g.rows.clear();
            g.row_ids.clear();
            g.row_index.clear();
            g.selection.clear();
            g.pagination.page_index = 0;
        });
    }

    /// Get the number of rows in the data set.
    pub fn len(&self) -> usize {
        self.read(|g| g.rows.len()).unwrap_or(0)
    }

    /// Check if the data set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get all rows in data order.
    pub fn rows(&self) -> Vec<T> {
        self.read(|g| g.rows.clone()).unwrap_or_default()
    }

    /// Find a row by ID.
    pub fn row(&self, id: &str) -> Option<T> {
        self.read(|g| g.row_index.get(id).map(|&index| g.rows[index].clone()))
            .flatten()
    }

    /// Number of rows passing the filters.
    pub fn filtered_len(&self) -> usize {
        self.read(|g| g.filtered_indices().len()).unwrap_or(0)
    }

    /// Rows passing the filters, in display order.
    pub fn filtered_rows(&self) -> Vec<T> {
        self.read(|g| {
            g.sorted_indices()
                .into_iter()
                .map(|index| g.rows[index].clone())
                .collect()
        })
        .unwrap_or_default()
    }

    /// Rows of the current page, in display order.
    pub fn page_rows(&self) -> Vec<T> {
        self.read(|g| {
            g.page_indices()
                .into_iter()
                .map(|index| g.rows[index].clone())
                .collect()
        })
        .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Get the global filter query.
    pub fn global_filter(&self) -> String {
        self.read(|g| g.global_filter.clone()).unwrap_or_default()
    }

    /// Set the global filter query. Resets to the first page when it changes.
    pub fn set_global_filter(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|g| {
            if g.global_filter != query {
                g.global_filter = query;
                g.pagination.page_index = 0;
            }
        });
    }

    /// Get a column filter query.
    pub fn column_filter(&self, column_id: &str) -> Option<String> {
        self.read(|g| g.column_filters.get(column_id).cloned())
            .flatten()
    }

    /// Set a column filter query; an empty query removes it.
    /// Resets to the first page when it changes. Unknown columns are ignored.
    pub fn set_column_filter(&self, column_id: &str, query: impl Into<String>) {
        let query = query.into();
        self.update(|g| {
            if g.column(column_id).is_none() {
                return;
            }
            let changed = if query.is_empty() {
                g.column_filters.remove(column_id).is_some()
            } else {
                g.column_filters.insert(column_id.to_string(), query.clone()) != Some(query)
            };
            if changed {
                g.pagination.page_index = 0;
            }
        });
    }

    /// Clear the global filter and all column filters.
    pub fn clear_filters(&self) {
        self.update(|g| {
            if !g.global_filter.is_empty() || !g.column_filters.is_empty() {
                g.global_filter.clear();
                g.column_filters.clear();
                g.pagination.page_index = 0;
            }
        });
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Get current sort keys.
    pub fn sorting(&self) -> Vec<ColumnSort> {
        self.read(|g| g.sorting.clone()).unwrap_or_default()
    }

    /// Replace the sort keys. Keys on unknown or unsortable columns are dropped.
    pub fn set_sorting(&self, sorting: Vec<ColumnSort>) {
        self.update(|g| {
            let sorting: Vec<ColumnSort> = sorting
                .into_iter()
                .filter(|sort| g.column(&sort.column_id).is_some_and(|c| c.sortable))
                .collect();
            if g.sorting != sorting {
                g.sorting = sorting;
                g.pagination.page_index = 0;
            }
        });
    }

    /// Get the sort direction of a column.
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.read(|g| g.sort_direction(column_id)).flatten()
    }

    /// Cycle a column through unsorted, ascending and descending.
    ///
    /// Sorting on one column replaces any other active sort.
    /// Returns the new direction of the column.
    pub fn toggle_sort(&self, column_id: &str) -> Option<SortDirection> {
        self.update(|g| {
            if !g.column(column_id).is_some_and(|c| c.sortable) {
                return g.sort_direction(column_id);
            }
            let next = match g.sort_direction(column_id) {
                None => Some(SortDirection::Ascending),
                Some(SortDirection::Ascending) => Some(SortDirection::Descending),
                Some(SortDirection::Descending) => None,
            };
            g.sorting = next
                .map(|direction| {
                    vec![ColumnSort {
                        column_id: column_id.to_string(),
                        direction,
                    }]
                })
                .unwrap_or_default();
            g.pagination.page_index = 0;
            next
        })
        .flatten()
    }

    /// Clear sort state.
    pub fn clear_sort(&self) {
        self.update(|g| {
            if !g.sorting.is_empty() {
                g.sorting.clear();
                g.pagination.page_index = 0;
            }
        });
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Get the pagination state.
    pub fn pagination(&self) -> Pagination {
        self.read(|g| g.pagination).unwrap_or(Pagination {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Get the 0-based page index.
    pub fn page_index(&self) -> usize {
        self.pagination().page_index
    }

    /// Get the page size.
    pub fn page_size(&self) -> usize {
        self.pagination().page_size
    }

    /// Number of pages; at least 1, even with no rows.
    pub fn page_count(&self) -> usize {
        self.read(|g| g.page_count()).unwrap_or(1)
    }

    /// Go to a page. Out-of-range indices are clamped.
    pub fn set_page_index(&self, index: usize) {
        self.update(|g| {
            g.pagination.page_index = index;
            g.clamp_page();
        });
    }

    /// Set the page size, clamped to `[1, max_page_size]`.
    ///
    /// The first row of the current page stays on screen.
    pub fn set_page_size(&self, size: usize) {
        self.update(|g| {
            let size = size.clamp(1, g.options.max_page_size);
            let first_row = g.pagination.page_index * g.pagination.page_size;
            g.pagination.page_size = size;
            g.pagination.page_index = first_row / size;
            g.clamp_page();
        });
    }

    /// Check if there is a next page.
    pub fn can_next_page(&self) -> bool {
        self.read(|g| g.pagination.page_index + 1 < g.page_count())
            .unwrap_or(false)
    }

    /// Check if there is a previous page.
    pub fn can_previous_page(&self) -> bool {
        self.page_index() > 0
    }

    /// Go to the next page. Returns true if the page changed.
    pub fn next_page(&self) -> bool {
        self.update(|g| {
            if g.pagination.page_index + 1 < g.page_count() {
                g.pagination.page_index += 1;
                true
            } else {
                false
            }
        })
        .unwrap_or(false)
    }

    /// Go to the previous page. Returns true if the page changed.
    pub fn previous_page(&self) -> bool {
        self.update(|g| {
            if g.pagination.page_index > 0 {
                g.pagination.page_index -= 1;
                true
            } else {
                false
            }
        })
        .unwrap_or(false)
    }

    /// Go to the first page.
    pub fn first_page(&self) {
        self.set_page_index(0);
    }

    /// Go to the last page.
    pub fn last_page(&self) {
        self.set_page_index(usize::MAX);
    }

    /// 1-based page-number buttons around the current page.
    pub fn page_numbers(&self) -> Vec<usize> {
        self.read(|g| g.page_numbers(g.page_count()))
            .unwrap_or_else(|| vec![1])
    }

    /// Numbers behind "Showing X to Y of Z".
    pub fn summary(&self) -> PageSummary {
        self.read(|g| {
            let total = g.filtered_indices().len();
            g.summary(&g.page_range(total), total)
        })
        .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Register the selection callback, replacing any previous one.
    ///
    /// Called with the ordered selected IDs whenever that list changes.
    /// Never called when selection is disabled.
    pub fn on_selection_change<F>(&self, callback: F)
    where
        F: Fn(&[RowId]) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.inner.write() {
            guard.on_selection_change = Some(Arc::new(callback));
        }
    }

    /// Check if row selection is enabled.
    pub fn selection_enabled(&self) -> bool {
        self.read(|g| g.options.show_selection).unwrap_or(false)
    }

    /// Selected IDs present in the data, in data order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.read(|g| g.selected_ids()).unwrap_or_default()
    }

    /// Selected rows, in data order.
    pub fn selected_rows(&self) -> Vec<T> {
        self.read(|g| {
            g.row_ids
                .iter()
                .zip(&g.rows)
                .filter(|(id, _)| g.selection.is_selected(id))
                .map(|(_, row)| row.clone())
                .collect()
        })
        .unwrap_or_default()
    }

    /// Check if a row is selected by ID.
    pub fn is_row_selected(&self, id: &str) -> bool {
        self.read(|g| g.selection.is_selected(id)).unwrap_or(false)
    }

    /// The raw selection map.
    pub fn row_selection(&self) -> RowSelection {
        self.read(|g| g.selection.as_map().clone())
            .unwrap_or_default()
    }

    /// Replace the raw selection map. IDs not in the current data are
    /// dropped, like in [`toggle_row`](Self::toggle_row).
    ///
    /// The callback fires only if the derived ID list differs from the
    /// last one reported.
    pub fn set_row_selection(&self, selection: RowSelection) {
        self.update(|g| {
            if !g.options.show_selection {
                return;
            }
            let mut next = Selection::from_map(selection);
            let known: HashSet<&str> = g.row_ids.iter().map(String::as_str).collect();
            let unknown = next.retain_known(&known);
            if !unknown.is_empty() {
                debug!("{}: ignored {} unknown selected rows", self.id, unknown.len());
            }
            g.selection = next;
        });
    }

    /// Select or deselect one row. Unknown IDs are ignored.
    /// Returns true if the selection changed.
    pub fn set_row_selected(&self, id: &str, selected: bool) -> bool {
        self.update(|g| {
            g.options.show_selection
                && g.row_index.contains_key(id)
                && g.selection.set(id, selected)
        })
        .unwrap_or(false)
    }

    /// Flip one row's checkbox. Returns the new state.
    ///
    /// Other entries are untouched, including rows hidden by filters.
    pub fn toggle_row(&self, id: &str) -> bool {
        self.update(|g| {
            if g.options.show_selection && g.row_index.contains_key(id) {
                g.selection.toggle(id)
            } else {
                g.selection.is_selected(id)
            }
        })
        .unwrap_or(false)
    }

    /// Select or deselect every row of the current page.
    pub fn set_all_page_rows_selected(&self, selected: bool) {
        self.update(|g| {
            if !g.options.show_selection {
                return;
            }
            let page_ids: Vec<String> = g.page_ids().into_iter().map(str::to_string).collect();
            let ids = page_ids.iter().map(String::as_str);
            if selected {
                g.selection.select_all(ids);
            } else {
                g.selection.deselect_all(ids);
            }
        });
    }

    /// The select-all checkbox: selects the page unless it is fully selected.
    pub fn toggle_all_page_rows(&self) {
        let all = self.is_all_page_rows_selected();
        self.set_all_page_rows_selected(!all);
    }

    /// Check if every row of a non-empty page is selected.
    pub fn is_all_page_rows_selected(&self) -> bool {
        self.read(|g| {
            let ids = g.page_ids();
            !ids.is_empty() && g.page_check_state(&ids) == CheckState::Checked
        })
        .unwrap_or(false)
    }

    /// Check if some, but not all, rows of the page are selected.
    pub fn is_some_page_rows_selected(&self) -> bool {
        self.read(|g| g.page_check_state(&g.page_ids()) == CheckState::Indeterminate)
            .unwrap_or(false)
    }

    /// Clear all selection.
    pub fn reset_selection(&self) {
        self.update(|g| {
            g.selection.clear();
        });
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Snapshot of the current page for rendering.
    pub fn view(&self) -> TableView {
        self.read(|g| g.view()).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the table has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(atomic::Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, atomic::Ordering::SeqCst);
    }
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            identity: Arc::clone(&self.identity),
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table").field("id", &self.id).finish_non_exhaustive()
    }
}
