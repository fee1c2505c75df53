//! Generic data table engine for admin list views.
//!
//! A [`Table`] turns caller-owned rows and [`Column`] definitions into a
//! sortable, filterable, paginated grid with optional row selection. The
//! selected row IDs are pushed to the owner through
//! [`Table::on_selection_change`], gated by [`SelectionSync`] so an equal
//! list is never reported twice.

mod error;
mod item;
mod render;
mod selection;
mod state;
mod sync;
mod view;

pub use error::TableError;
pub use item::{Alignment, CellFn, CellValue, Column, RowId, RowIdentity, identity};
pub use render::{NO_RESULTS, render_text};
pub use selection::{RowSelection, Selection};
pub use state::{
    ColumnSort, DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_BUTTONS, DEFAULT_PAGE_SIZE, Pagination,
    SortDirection, Table, TableId, TableOptions,
};
pub use sync::{SelectionCallback, SelectionSync, same_ids};
pub use view::{
    CheckState, ColumnToggle, HeaderCell, PageSummary, PaginationView, TableView, ToolbarView,
    ViewRow,
};
