//! Tests for row selection and the selection callback.

use std::sync::{Arc, Mutex};

use archive_table::{
    CheckState, Column, NO_RESULTS, RowId, RowSelection, Table, TableOptions, identity,
    render_text,
};

#[derive(Debug, Clone)]
struct User {
    id: String,
    name: String,
}

fn users(n: usize) -> Vec<User> {
    (1..=n)
        .map(|i| User {
            id: i.to_string(),
            name: format!("User {}", i),
        })
        .collect()
}

fn table(options: TableOptions) -> Table<User> {
    Table::new(
        vec![Column::new("name", "Name", |u: &User| u.name.as_str().into()).sortable()],
        identity(|u: &User| u.id.clone()),
        options,
    )
    .unwrap()
}

/// Records every list the table reports.
fn record(table: &Table<User>) -> Arc<Mutex<Vec<Vec<RowId>>>> {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    table.on_selection_change(move |ids| sink.lock().unwrap().push(ids.to_vec()));
    calls
}

fn strings(values: &[&str]) -> Vec<RowId> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_selection_survives_filtering() {
    let t = table(TableOptions::default().with_selection());
    t.set_rows(users(5)).unwrap();

    t.toggle_row("3");
    assert!(t.is_row_selected("3"));

    t.set_global_filter("x");
    let view = t.view();
    assert!(view.empty);
    assert!(render_text(&view).contains(NO_RESULTS));
    assert_eq!(t.selected_ids(), strings(&["3"]));

    t.set_global_filter("");
    let view = t.view();
    assert_eq!(view.row("3").and_then(|r| r.selected), Some(true));
    assert_eq!(view.row("2").and_then(|r| r.selected), Some(false));
}

#[test]
fn test_equal_selection_is_not_reported_twice() {
    let t = table(TableOptions::default().with_selection());
    t.set_rows(users(5)).unwrap();
    let calls = record(&t);

    t.toggle_row("3");
    assert_eq!(calls.lock().unwrap().len(), 1);

    // A different map instance deriving the same list.
    let mut map = RowSelection::new();
    map.insert("3".to_string(), true);
    map.insert("4".to_string(), false);
    t.set_row_selection(map);
    assert_eq!(calls.lock().unwrap().len(), 1);

    // Re-injecting equal data derives the same list again.
    t.set_rows(users(5)).unwrap();
    t.set_global_filter("user");
    t.next_page();
    assert_eq!(calls.lock().unwrap().len(), 1);
    assert_eq!(calls.lock().unwrap()[0], strings(&["3"]));
}

#[test]
fn test_callback_reports_data_order() {
    let t = table(TableOptions::default().with_selection());
    t.set_rows(users(5)).unwrap();
    let calls = record(&t);

    t.set_row_selected("4", true);
    t.set_row_selected("1", true);
    t.set_row_selected("4", false);

    let calls = calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![strings(&["4"]), strings(&["1", "4"]), strings(&["1"])]
    );
}

#[test]
fn test_unknown_ids_are_ignored() {
    let t = table(TableOptions::default().with_selection());
    t.set_rows(users(2)).unwrap();
    let calls = record(&t);

    assert!(!t.set_row_selected("99", true));
    assert!(!t.toggle_row("99"));
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_select_all_is_page_scoped() {
    let t = table(TableOptions::default().with_selection().page_size(2));
    t.set_rows(users(5)).unwrap();
    t.next_page();

    t.toggle_all_page_rows();
    assert_eq!(t.selected_ids(), strings(&["3", "4"]));
    assert!(t.is_all_page_rows_selected());
    assert_eq!(t.view().select_all, Some(CheckState::Checked));

    t.first_page();
    assert!(!t.is_all_page_rows_selected());
    assert!(!t.is_some_page_rows_selected());
    assert_eq!(t.view().select_all, Some(CheckState::Unchecked));

    t.toggle_row("1");
    assert!(t.is_some_page_rows_selected());
    assert_eq!(t.view().select_all, Some(CheckState::Indeterminate));

    t.next_page();
    t.toggle_all_page_rows();
    assert_eq!(t.selected_ids(), strings(&["1"]));
}

#[test]
fn test_select_all_respects_filter_and_sort() {
    let t = table(TableOptions::default().with_selection().page_size(2));
    t.set_rows(users(12)).unwrap();
    t.set_global_filter("user 1");
    t.toggle_sort("name");
    t.toggle_sort("name");
    // Filtered: 1, 10, 11, 12; descending by name: 12, 11, 10, 1
    t.set_all_page_rows_selected(true);
    assert_eq!(t.selected_ids(), strings(&["11", "12"]));
}

#[test]
fn test_vanished_rows_are_pruned() {
    let t = table(TableOptions::default().with_selection());
    t.set_rows(users(5)).unwrap();
    let calls = record(&t);

    t.set_row_selected("2", true);
    t.set_row_selected("5", true);
    t.set_rows(users(3)).unwrap();

    assert_eq!(t.selected_ids(), strings(&["2"]));
    assert!(!t.row_selection().contains_key("5"));
    assert_eq!(calls.lock().unwrap().last().unwrap(), &strings(&["2"]));
}

#[test]
fn test_reset_selection_reports_empty() {
    let t = table(TableOptions::default().with_selection());
    t.set_rows(users(3)).unwrap();
    let calls = record(&t);

    t.toggle_row("1");
    t.reset_selection();
    t.reset_selection();

    let calls = calls.lock().unwrap();
    assert_eq!(*calls, vec![strings(&["1"]), Vec::<RowId>::new()]);
}

#[test]
fn test_selection_disabled_is_inert() {
    let t = table(TableOptions::default());
    t.set_rows(users(3)).unwrap();
    let calls = record(&t);

    assert!(!t.set_row_selected("1", true));
    t.toggle_all_page_rows();
    assert!(t.selected_ids().is_empty());
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(t.view().select_all, None);
}

#[test]
fn test_callback_may_read_table() {
    let t = table(TableOptions::default().with_selection());
    t.set_rows(users(3)).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handle = t.clone();
    t.on_selection_change(move |ids| {
        // Runs after the table lock is released.
        let rows = handle.selected_rows();
        sink.lock().unwrap().push((ids.len(), rows.len()));
    });

    t.toggle_row("2");
    t.toggle_row("3");
    assert_eq!(*seen.lock().unwrap(), vec![(1, 1), (2, 2)]);
}

#[test]
fn test_selected_rows_in_data_order() {
    let t = table(TableOptions::default().with_selection());
    t.set_rows(users(4)).unwrap();
    t.toggle_row("4");
    t.toggle_row("2");
    let names: Vec<String> = t.selected_rows().into_iter().map(|u| u.name).collect();
    assert_eq!(names, vec!["User 2", "User 4"]);
    assert_eq!(t.view().selected_count, 2);
}

#[test]
fn test_selection_map_ignores_unknown_ids() {
    let t = table(TableOptions::default().with_selection());
    t.set_rows(users(3)).unwrap();
    let calls = record(&t);

    let mut map = RowSelection::new();
    map.insert("2".to_string(), true);
    map.insert("9".to_string(), true);
    t.set_row_selection(map);
    assert_eq!(t.selected_ids(), strings(&["2"]));
    assert!(!t.row_selection().contains_key("9"));

    // Row 9 arriving later does not come back checked.
    t.set_rows(users(9)).unwrap();
    assert_eq!(t.selected_ids(), strings(&["2"]));
    assert!(!t.is_row_selected("9"));
    assert_eq!(*calls.lock().unwrap(), vec![strings(&["2"])]);
}
