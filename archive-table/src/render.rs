//! Plain-text rendering of a [`TableView`].
//!
//! Produces an aligned grid for logs, snapshots and tests:
//!
//! ```text
//! Filter: thesis
//! [-] | Title ▲        | Pages
//! ----+----------------+------
//! [x] | Alpha          |    12
//! [ ] | Beta           |     3
//! Showing 1 to 2 of 2   < [1] >
//! ```

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::item::Alignment;
use crate::view::{CheckState, PaginationView, TableView};

/// Text of the body row shown when the filtered set is empty.
pub const NO_RESULTS: &str = "No results";

const SEPARATOR: &str = " | ";

/// Render a table snapshot as text.
pub fn render_text(view: &TableView) -> String {
    let mut lines = Vec::new();

    if let Some(filter) = &view.toolbar.global_filter {
        lines.push(format!("Filter: {}", filter));
    }
    let hidden: Vec<&str> = view
        .toolbar
        .column_toggles
        .iter()
        .filter(|toggle| !toggle.visible)
        .map(|toggle| toggle.header.as_str())
        .collect();
    if !hidden.is_empty() {
        lines.push(format!("Hidden: {}", hidden.join(", ")));
    }

    let labels: Vec<String> = view.headers.iter().map(|header| header.label()).collect();
    let widths: Vec<usize> = view
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| match header.width {
            Some(width) => usize::from(width),
            None => view
                .rows
                .iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| cell.width())
                .chain(std::iter::once(labels[i].width()))
                .max()
                .unwrap_or(0),
        })
        .collect();
    let checkbox = view.select_all.map(|state| {
        match state {
            CheckState::Unchecked => "[ ]",
            CheckState::Indeterminate => "[-]",
            CheckState::Checked => "[x]",
        }
        .to_string()
    });

    // Header
    let mut cells: Vec<String> = Vec::new();
    cells.extend(checkbox);
    cells.extend(
        labels
            .iter()
            .zip(&widths)
            .map(|(label, &width)| pad(label, width, Alignment::Left)),
    );
    lines.push(cells.join(SEPARATOR).trim_end().to_string());

    let mut rule: Vec<String> = Vec::new();
    if view.select_all.is_some() {
        rule.push("-".repeat(3));
    }
    rule.extend(widths.iter().map(|&width| "-".repeat(width)));
    lines.push(rule.join("-+-"));

    // Body
    if view.empty {
        lines.push(NO_RESULTS.to_string());
    } else {
        for row in &view.rows {
            let mut cells: Vec<String> = Vec::new();
            if let Some(selected) = row.selected {
                cells.push(if selected { "[x]" } else { "[ ]" }.to_string());
            }
            cells.extend(
                view.headers
                    .iter()
                    .zip(&widths)
                    .zip(&row.cells)
                    .map(|((header, &width), cell)| pad(cell, width, header.align)),
            );
            lines.push(cells.join(SEPARATOR).trim_end().to_string());
        }
    }

    if let Some(pagination) = &view.pagination {
        lines.push(render_pagination(pagination, view.selected_count));
    }

    lines.join("\n")
}

fn render_pagination(pagination: &PaginationView, selected: usize) -> String {
    let pages: Vec<String> = pagination
        .pages
        .iter()
        .map(|&page| {
            if page == pagination.page_index + 1 {
                format!("[{}]", page)
            } else {
                page.to_string()
            }
        })
        .collect();
    let previous = if pagination.can_previous { "<" } else { " " };
    let next = if pagination.can_next { ">" } else { " " };
    let mut line = format!(
        "{}   {} {} {}",
        pagination.summary,
        previous,
        pages.join(" "),
        next
    );
    if selected > 0 {
        line.push_str(&format!("   {} selected", selected));
    }
    line.trim_end().to_string()
}

/// Fit `text` into `width` terminal columns, truncating with an ellipsis.
fn pad(text: &str, width: usize, align: Alignment) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(text.width());
    match align {
        Alignment::Left => format!("{}{}", text, " ".repeat(fill)),
        Alignment::Right => format!("{}{}", " ".repeat(fill), text),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_alignment() {
        assert_eq!(pad("ab", 4, Alignment::Left), "ab  ");
        assert_eq!(pad("ab", 4, Alignment::Right), "  ab");
        assert_eq!(pad("ab", 5, Alignment::Center), " ab  ");
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        // CJK characters take two columns each.
        assert_eq!(truncate("日本語", 4), "日…");
        assert_eq!(truncate("日本語", 6), "日本語");
    }

    #[test]
    fn test_empty_view_renders_no_results() {
        let view = TableView {
            empty: true,
            ..TableView::default()
        };
        assert!(render_text(&view).contains(NO_RESULTS));
    }
}
