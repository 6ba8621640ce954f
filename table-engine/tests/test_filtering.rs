//! FILENAME: tests/test_filtering.rs
//! Integration tests for column, global and quick filters.

mod common;

use common::{people_table, people_table_with, row_ids, PeopleFixture};
use pretty_assertions::assert_eq;
use table_engine::{
    CellValue, ColumnDef, FeatureFlags, FilterValue, PaginationState, SetFilter, Table, TableOptions,
};

// ============================================================================
// GLOBAL FILTER
// ============================================================================

#[test]
fn test_global_filter_matches_department() {
    let mut table = people_table();
    table.set_global_filter(Some(FilterValue::text("Eng")));
    assert_eq!(row_ids(&table), vec!["0", "3"]);
    assert_eq!(table.pre_filtered_row_model().len(), 5);
}

#[test]
fn test_global_filter_skips_excluded_columns() {
    let mut columns = PeopleFixture::columns();
    columns[2] = ColumnDef::accessor("email").globally_filterable(false);
    let mut table = Table::new(TableOptions::new(PeopleFixture::data(), columns));

    table.set_global_filter(Some(FilterValue::text("example.com")));
    assert!(table.row_model().is_empty());
}

#[test]
fn test_global_filter_disabled_keeps_rows() {
    let mut table = people_table_with(|options| {
        options.with_features(FeatureFlags {
            enable_global_filter: false,
            ..FeatureFlags::default()
        })
    });
    table.set_global_filter(Some(FilterValue::text("Eng")));
    assert_eq!(table.row_model().len(), 5);
}

#[test]
fn test_global_cell_predicate_matches_any_cell() {
    let mut table = people_table();
    table.set_global_filter(Some(FilterValue::cell(|v| v.as_f64().is_some_and(|n| n > 100_000.0))));
    assert_eq!(row_ids(&table), vec!["0", "3"]);
}

// ============================================================================
// COLUMN FILTERS
// ============================================================================

#[test]
fn test_filter_value_shapes() {
    let mut table = people_table();

    table.set_column_filter("department", Some(FilterValue::Set(SetFilter::new(["Eng", "HR"]))));
    assert_eq!(row_ids(&table), vec!["0", "3", "4"]);

    table.set_column_filter("department", None);
    table.set_column_filter("salary", Some(FilterValue::range(Some(90_000.0), None)));
    assert_eq!(row_ids(&table), vec!["0", "1", "3"]);

    table.set_column_filter("salary", None);
    table.set_column_filter("age", Some(FilterValue::equals(28)));
    assert_eq!(row_ids(&table), vec!["1", "3"]);

    table.set_column_filter("age", None);
    table.set_column_filter(
        "name",
        Some(FilterValue::cell(|v| v.as_str().is_some_and(|s| s.starts_with('C')))),
    );
    assert_eq!(row_ids(&table), vec!["2"]);
}

#[test]
fn test_row_predicate_sees_whole_row() {
    let mut table = people_table();
    table.set_column_filter(
        "name",
        Some(FilterValue::row(|row| {
            let older = row.get("age").and_then(|v| v.as_f64()).is_some_and(|age| age > 30.0);
            let not_eng = row.get("department") != Some(CellValue::text("Eng"));
            older && not_eng
        })),
    );
    assert_eq!(row_ids(&table), vec!["2", "4"]);
}

#[test]
fn test_filters_combine_with_and() {
    let mut table = people_table();
    table.set_column_filter("age", Some(FilterValue::equals(28)));
    table.set_global_filter(Some(FilterValue::text("eng")));
    assert_eq!(row_ids(&table), vec!["3"]);
}

#[test]
fn test_set_filter_tokens_and_blanks() {
    #[derive(Clone)]
    struct Post(&'static str);

    impl table_engine::Record for Post {
        fn field(&self, key: &str) -> Option<CellValue> {
            (key == "tags").then(|| CellValue::text(self.0))
        }
    }

    let data = vec![Post("rust, web"), Post("go"), Post(""), Post("web")];
    let mut table = Table::new(TableOptions::new(data, vec![ColumnDef::accessor("tags")]));

    let web = SetFilter::new(["WEB"]).with_separator(',');
    table.set_column_filter("tags", Some(FilterValue::Set(web.clone())));
    assert_eq!(row_ids_of(&table), vec!["0", "3"]);

    table.set_column_filter("tags", Some(FilterValue::Set(web.with_blanks(true))));
    assert_eq!(row_ids_of(&table), vec!["0", "2", "3"]);
}

fn row_ids_of<T: table_engine::Record>(table: &Table<T>) -> Vec<String> {
    table.row_model().rows().iter().map(|r| r.id().to_string()).collect()
}

#[test]
fn test_invalid_filters_dropped() {
    let mut table = people_table();
    table.set_column_filter("nope", Some(FilterValue::text("x")));
    assert!(table.state().column_filters.is_empty());

    table.set_column_filter("name", Some(FilterValue::text("")));
    assert!(table.state().column_filters.is_empty());
    assert_eq!(table.row_model().len(), 5);
}

#[test]
fn test_column_filters_disabled() {
    let mut table = people_table_with(|options| {
        options.with_features(FeatureFlags {
            enable_column_filters: false,
            ..FeatureFlags::default()
        })
    });
    table.set_column_filter("department", Some(FilterValue::text("eng")));
    assert_eq!(table.row_model().len(), 5);
}

// ============================================================================
// QUICK FILTER
// ============================================================================

#[test]
fn test_quick_filter_is_independent_of_state() {
    let mut table = people_table();
    let state = table.state().clone();

    table.set_quick_filter(Some("ALI".to_string()));
    assert_eq!(row_ids(&table), vec!["0"]);
    assert_eq!(table.state(), &state);
    assert_eq!(table.quick_filter(), Some("ALI"));

    table.set_global_filter(Some(FilterValue::text("eng")));
    table.set_quick_filter(Some("dan".to_string()));
    assert_eq!(row_ids(&table), vec!["3"]);

    table.reset_quick_filter();
    assert_eq!(row_ids(&table), vec!["0", "3"]);
}

#[test]
fn test_quick_filter_resets_page() {
    let mut table = common::generated_table(50);
    table.set_pagination(Some(PaginationState::new(3, 5)));
    table.set_quick_filter(Some("person00".to_string()));
    assert_eq!(table.state().pagination, Some(PaginationState::new(0, 5)));
    assert_eq!(table.page_count(), 2);
}
