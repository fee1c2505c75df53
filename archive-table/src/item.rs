//! Column definitions, cell values, and row identity.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

/// Stable identifier of a row, derived from a persistent key field.
pub type RowId = String;

/// Maps a row to its [`RowId`].
///
/// Must be derived from a persistent key of the row, never from its position
/// in the data set. Two rows of the same data set must never share an id.
pub type RowIdentity<T> = Arc<dyn Fn(&T) -> RowId + Send + Sync>;

/// Produces the value of one column for a row.
pub type CellFn<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Wrap a closure as a [`RowIdentity`].
pub fn identity<T, F>(f: F) -> RowIdentity<T>
where
    F: Fn(&T) -> RowId + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

// =============================================================================
// CellValue
// =============================================================================

/// The value a column produces for one row.
///
/// Values are compared for sorting and stringified for filtering and display.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Check if this cell has no value.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Compare two values of a column.
    ///
    /// Text compares case-insensitively first. Integers and numbers compare
    /// numerically with each other. Mixed kinds fall back to display text.
    /// Callers decide where empty values go.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Integer(a), Self::Number(b)) => (*a as f64).total_cmp(b),
            (Self::Number(a), Self::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }

    /// Case-insensitive substring match.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.to_string().to_lowercase().contains(needle)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(true) => f.write_str("Yes"),
            Self::Bool(false) => f.write_str("No"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or(Self::Empty)
    }
}

// =============================================================================
// Column
// =============================================================================

/// Column configuration.
///
/// A column has a unique id, header text, and a cell function that reads
/// the displayed value from a row. The table never inspects row fields
/// directly.
///
/// # Examples
///
/// ```ignore
/// let columns = vec![
///     Column::new("title", "Title", |d: &Document| d.title.as_str().into()).sortable(),
///     Column::new("pages", "Pages", |d: &Document| d.pages.into())
///         .width(6)
///         .align(Alignment::Right),
/// ];
/// ```
pub struct Column<T> {
    /// Unique identifier within one table.
    pub id: String,
    /// Column header text.
    pub header: String,
    /// Fixed width in terminal columns, if any.
    pub width: Option<u16>,
    /// Horizontal alignment.
    pub align: Alignment,
    /// Whether clicking the header cycles sorting.
    pub sortable: bool,
    /// Whether this column takes part in filtering.
    pub filterable: bool,
    /// Whether the column toggle may hide this column.
    pub hideable: bool,
    cell: CellFn<T>,
}

impl<T> Column<T> {
    /// Create a filterable, hideable, unsorted column.
    pub fn new<F>(id: impl Into<String>, header: impl Into<String>, cell: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            width: None,
            align: Alignment::Left,
            sortable: false,
            filterable: true,
            hideable: true,
            cell: Arc::new(cell),
        }
    }

    /// Set a fixed width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Exclude the column from filtering.
    pub fn unfilterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    /// Keep the column visible regardless of the column toggle.
    pub fn always_visible(mut self) -> Self {
        self.hideable = false;
        self
    }

    /// Read this column's value from a row.
    pub fn cell(&self, row: &T) -> CellValue {
        (self.cell)(row)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            width: self.width,
            align: self.align,
            sortable: self.sortable,
            filterable: self.filterable,
            hideable: self.hideable,
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("hideable", &self.hideable)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_compare_is_case_insensitive() {
        let a = CellValue::text("apple");
        let b = CellValue::text("Banana");
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn test_mixed_numbers_compare_numerically() {
        assert_eq!(
            CellValue::Integer(2).compare(&CellValue::Number(10.5)),
            Ordering::Less
        );
    }

    #[test]
    fn test_matches_uses_display_text() {
        let date = CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert!(date.matches("2024-03"));
        assert!(CellValue::Bool(true).matches("yes"));
        assert!(!CellValue::Empty.matches("a"));
        assert!(CellValue::Empty.matches(""));
    }

    #[test]
    fn test_option_into_cell() {
        let none: Option<&str> = None;
        assert!(CellValue::from(none).is_empty());
        assert_eq!(CellValue::from(Some(3i64)), CellValue::Integer(3));
    }

    #[test]
    fn test_column_reads_cell() {
        let column = Column::new("len", "Length", |s: &String| (s.len() as u64).into())
            .sortable()
            .width(4);
        assert_eq!(column.cell(&"abc".to_string()), CellValue::Integer(3));
        assert!(column.sortable);
        assert!(column.filterable);
        assert_eq!(column.width, Some(4));
    }
}
