//! FILENAME: tests/test_selection_expansion.rs
//! Integration tests for row selection and group expansion.

mod common;

use common::{people_table, people_table_with, row_ids, PeopleFixture};
use pretty_assertions::assert_eq;
use table_engine::{ExpandedState, FeatureFlags, FilterValue, RowSelectionState, Table, TableOptions};

fn selected_ids(table: &table_engine::Table<common::Person>) -> Vec<String> {
    table.selected_rows().iter().map(|r| r.id().to_string()).collect()
}

// ============================================================================
// SELECTION
// ============================================================================

#[test]
fn test_toggle_row_selected() {
    let mut table = people_table();
    table.toggle_row_selected("1");
    table.toggle_row_selected("3");
    assert_eq!(selected_ids(&table), vec!["1", "3"]);
    assert!(table.row("1").unwrap().is_selected(table.state()));

    table.toggle_row_selected("1");
    assert_eq!(selected_ids(&table), vec!["3"]);

    table.toggle_row_selected("missing");
    assert_eq!(selected_ids(&table), vec!["3"]);
}

#[test]
fn test_single_row_selection_replaces() {
    let mut table = people_table_with(|options| {
        options.with_features(FeatureFlags {
            enable_multi_row_selection: false,
            ..FeatureFlags::default()
        })
    });
    table.toggle_row_selected("1");
    table.toggle_row_selected("3");
    assert_eq!(selected_ids(&table), vec!["3"]);

    // Bulk input keeps a single row as well
    let bulk: RowSelectionState = [("4".to_string(), true), ("2".to_string(), true)].into_iter().collect();
    table.set_row_selection(bulk);
    assert_eq!(selected_ids(&table), vec!["2"]);
}

#[test]
fn test_group_row_selects_leaves() {
    let mut table = people_table();
    table.set_grouping(vec!["department".to_string()]);

    table.toggle_row_selected("department:Eng");
    assert_eq!(selected_ids(&table), vec!["0", "3"]);
    let eng = table.row("department:Eng").unwrap();
    assert!(eng.is_selected(table.state()));

    table.toggle_row_selected("0");
    let eng = table.row("department:Eng").unwrap();
    assert!(!eng.is_selected(table.state()));
    assert!(eng.is_some_selected(table.state()));
}

#[test]
fn test_group_row_under_single_selection() {
    let mut table = people_table_with(|options| {
        options.with_features(FeatureFlags {
            enable_multi_row_selection: false,
            ..FeatureFlags::default()
        })
    });
    table.set_grouping(vec!["department".to_string()]);

    // The group stands for its first leaf; toggling again clears it
    table.toggle_row_selected("department:Eng");
    assert_eq!(selected_ids(&table), vec!["0"]);
    assert!(table.row("department:Eng").unwrap().is_some_selected(table.state()));

    table.toggle_row_selected("department:Eng");
    assert!(selected_ids(&table).is_empty());

    table.toggle_row_selected("1");
    table.toggle_row_selected("department:Eng");
    assert_eq!(selected_ids(&table), vec!["0"]);
}

#[test]
fn test_single_selection_bulk_uses_natural_id_order() {
    common::init_logger();
    let mut table = Table::new(
        TableOptions::new(PeopleFixture::generated(12), PeopleFixture::columns()).with_features(FeatureFlags {
            enable_multi_row_selection: false,
            ..FeatureFlags::default()
        }),
    );
    let bulk: RowSelectionState = [("10".to_string(), true), ("2".to_string(), true)].into_iter().collect();
    table.set_row_selection(bulk);
    assert_eq!(selected_ids(&table), vec!["2"]);
}

#[test]
fn test_toggle_all_rows_selected_uses_filtered_rows() {
    let mut table = people_table();
    table.set_global_filter(Some(FilterValue::text("eng")));

    table.toggle_all_rows_selected();
    assert_eq!(selected_ids(&table), vec!["0", "3"]);
    assert!(table.is_all_rows_selected());

    table.toggle_all_rows_selected();
    assert!(table.selected_rows().is_empty());
}

#[test]
fn test_selection_disabled_clears() {
    let mut table = people_table_with(|options| {
        options.with_features(FeatureFlags {
            enable_row_selection: false,
            ..FeatureFlags::default()
        })
    });
    table.toggle_row_selected("1");
    assert!(table.state().row_selection.is_empty());
}

// ============================================================================
// EXPANSION
// ============================================================================

#[test]
fn test_expand_single_group() {
    let mut table = people_table();
    table.set_grouping(vec!["department".to_string()]);
    assert_eq!(table.row_model().len(), 4);

    table.toggle_row_expanded("department:Mkt");
    assert_eq!(
        row_ids(&table),
        vec!["department:Eng", "department:Mkt", "1", "department:Sales", "department:HR"]
    );
    assert!(table.row("department:Mkt").unwrap().is_expanded(table.state()));
}

#[test]
fn test_toggle_all_and_collapse_one() {
    let mut table = people_table();
    table.set_grouping(vec!["department".to_string()]);

    table.toggle_all_rows_expanded();
    assert_eq!(table.state().expanded, ExpandedState::All);
    assert_eq!(table.row_model().len(), 9);
    assert!(table.is_all_rows_expanded());

    // Collapsing one row under All keeps the others open
    table.toggle_row_expanded("department:Eng");
    assert_eq!(table.row_model().len(), 7);
    assert!(!table.is_all_rows_expanded());

    table.toggle_all_rows_expanded();
    assert_eq!(table.row_model().len(), 9);
    table.toggle_all_rows_expanded();
    assert_eq!(table.row_model().len(), 4);
}

#[test]
fn test_nested_expansion_requires_every_ancestor() {
    let mut table = people_table();
    table.set_grouping(vec!["department".to_string(), "age".to_string()]);

    table.toggle_row_expanded("department:Eng>age:34");
    assert_eq!(table.row_model().len(), 4);

    table.toggle_row_expanded("department:Eng");
    assert_eq!(
        row_ids(&table),
        vec![
            "department:Eng",
            "department:Eng>age:34",
            "0",
            "department:Eng>age:28",
            "department:Mkt",
            "department:Sales",
            "department:HR",
        ]
    );
}

#[test]
fn test_expansion_without_grouping_is_passthrough() {
    let mut table = people_table();
    table.set_expanded(ExpandedState::All);
    assert_eq!(row_ids(&table), vec!["0", "1", "2", "3", "4"]);
    table.reset_expanded();
    assert_eq!(table.state().expanded, ExpandedState::default());
}
