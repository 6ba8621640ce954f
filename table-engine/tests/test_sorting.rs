//! FILENAME: tests/test_sorting.rs
//! Integration tests for sorting and the sort toggle cycle.

mod common;

use common::{column_values, people_table, people_table_with, row_ids, Person, PeopleFixture};
use pretty_assertions::assert_eq;
use table_engine::{
    CellValue, ColumnDef, ColumnSort, FeatureFlags, SortDirection, SortingFn, Table, TableOptions,
};

#[test]
fn test_sort_is_stable_for_equal_keys() {
    let mut table = people_table();

    // Bob and Dan are both 28; input order is kept in both directions
    table.set_sorting(vec![ColumnSort::asc("age")]);
    assert_eq!(row_ids(&table), vec!["1", "3", "0", "4", "2"]);

    table.set_sorting(vec![ColumnSort::desc("age")]);
    assert_eq!(row_ids(&table), vec!["2", "4", "0", "1", "3"]);
}

#[test]
fn test_three_toggles_clear_sorting() {
    let mut table = people_table();

    table.toggle_sort("age");
    assert_eq!(table.column("age").unwrap().sort_direction(table.state()), Some(SortDirection::Asc));
    table.toggle_sort("age");
    assert_eq!(table.state().sorting, vec![ColumnSort::desc("age")]);
    table.toggle_sort("age");
    assert!(table.state().sorting.is_empty());
    assert_eq!(row_ids(&table), vec!["0", "1", "2", "3", "4"]);
}

#[test]
fn test_single_sort_replaces_other_columns() {
    let mut table = people_table();
    table.toggle_sort("age");
    table.toggle_sort("name");
    assert_eq!(table.state().sorting, vec![ColumnSort::asc("name")]);
}

#[test]
fn test_multi_sort_keeps_existing_entries() {
    let mut table = people_table_with(|options| {
        options.with_features(FeatureFlags {
            enable_multi_sort: true,
            ..FeatureFlags::default()
        })
    });

    table.toggle_sorting("age", true);
    table.toggle_sorting("salary", true);
    assert_eq!(table.state().sorting, vec![ColumnSort::asc("age"), ColumnSort::asc("salary")]);
    // Bob and Dan tie on age; salary breaks the tie
    assert_eq!(row_ids(&table), vec!["1", "3", "0", "4", "2"]);

    table.toggle_sorting("salary", true);
    assert_eq!(row_ids(&table), vec!["3", "1", "0", "4", "2"]);

    table.toggle_sorting("age", true);
    table.toggle_sorting("age", true);
    assert_eq!(table.state().sorting, vec![ColumnSort::desc("salary")]);
    assert_eq!(table.column("salary").unwrap().sort_index(table.state()), Some(0));
}

#[test]
fn test_multi_sort_cap_drops_oldest() {
    let mut table = people_table_with(|options| {
        options.with_features(FeatureFlags {
            enable_multi_sort: true,
            max_multi_sort_col_count: Some(2),
            ..FeatureFlags::default()
        })
    });
    table.toggle_sorting("age", true);
    table.toggle_sorting("salary", true);
    table.toggle_sorting("name", true);
    assert_eq!(table.state().sorting, vec![ColumnSort::asc("salary"), ColumnSort::asc("name")]);
}

#[test]
fn test_desc_first_and_no_removal() {
    let mut columns = PeopleFixture::columns();
    columns[1] = ColumnDef::accessor("age").sort_desc_first(true);
    let mut table = Table::new(
        TableOptions::new(PeopleFixture::data(), columns).with_features(FeatureFlags {
            enable_sorting_removal: false,
            ..FeatureFlags::default()
        }),
    );

    table.toggle_sort("age");
    assert_eq!(table.state().sorting, vec![ColumnSort::desc("age")]);
    table.toggle_sort("age");
    assert_eq!(table.state().sorting, vec![ColumnSort::asc("age")]);
    table.toggle_sort("age");
    assert_eq!(table.state().sorting, vec![ColumnSort::desc("age")]);
}

#[test]
fn test_empty_values_sort_last() {
    let mut columns = PeopleFixture::columns();
    columns.push(ColumnDef::accessor_fn("bonus", |p: &Person| {
        if p.department == "Eng" {
            CellValue::Number(p.salary / 10.0)
        } else {
            CellValue::Empty
        }
    }));
    let mut table = Table::new(TableOptions::new(PeopleFixture::data(), columns));

    table.set_sorting(vec![ColumnSort::asc("bonus")]);
    assert_eq!(&row_ids(&table)[..2], &["3".to_string(), "0".to_string()]);

    table.set_sorting(vec![ColumnSort::desc("bonus")]);
    assert_eq!(&row_ids(&table)[..2], &["0".to_string(), "3".to_string()]);
    assert_eq!(column_values(&table, "bonus")[4], CellValue::Empty);
}

#[test]
fn test_alphanumeric_and_inverted_sorting() {
    #[derive(Clone)]
    struct Ticket(&'static str, u32);

    impl table_engine::Record for Ticket {
        fn field(&self, key: &str) -> Option<CellValue> {
            match key {
                "code" => Some(CellValue::text(self.0)),
                "rank" => Some(CellValue::from(self.1)),
                _ => None,
            }
        }
    }

    let data = vec![Ticket("item10", 2), Ticket("item2", 3), Ticket("Item1", 1)];
    let columns = vec![
        ColumnDef::accessor("code").sorting_fn(SortingFn::Alphanumeric),
        ColumnDef::accessor("rank").invert_sorting(true),
    ];
    let mut table = Table::new(TableOptions::new(data, columns));

    table.set_sorting(vec![ColumnSort::asc("code")]);
    let codes: Vec<CellValue> = table.row_model().rows().iter().map(|r| r.value("code")).collect();
    assert_eq!(
        codes,
        vec![CellValue::text("Item1"), CellValue::text("item2"), CellValue::text("item10")]
    );

    // Inverted: ascending puts the highest rank number first
    table.set_sorting(vec![ColumnSort::asc("rank")]);
    let ranks: Vec<CellValue> = table.row_model().rows().iter().map(|r| r.value("rank")).collect();
    assert_eq!(ranks, vec![CellValue::Number(3.0), CellValue::Number(2.0), CellValue::Number(1.0)]);
}

#[test]
fn test_unsortable_column_ignored() {
    let mut columns = PeopleFixture::columns();
    columns[0] = ColumnDef::accessor("name").sortable(false);
    let mut table = Table::new(TableOptions::new(PeopleFixture::data(), columns));

    table.toggle_sort("name");
    assert!(table.state().sorting.is_empty());
    table.set_sorting(vec![ColumnSort::asc("name"), ColumnSort::asc("age")]);
    assert_eq!(table.state().sorting, vec![ColumnSort::asc("age")]);
}

#[test]
fn test_nan_values_sort_last_and_keep_numbers_ordered() {
    let mut columns = PeopleFixture::columns();
    columns.push(ColumnDef::accessor_fn("score", |p: &Person| {
        let n = (p.salary / 1_000.0) as u64;
        if n % 3 == 0 {
            f64::NAN
        } else {
            ((n * 37) % 101) as f64
        }
    }));
    let mut table = Table::new(TableOptions::new(PeopleFixture::generated(600), columns));

    for desc in [false, true] {
        table.set_sorting(vec![ColumnSort { id: "score".to_string(), desc }]);
        let scores = column_values(&table, "score");
        let split = scores.iter().position(|v| v.is_missing()).unwrap();
        assert_eq!(split, 400);
        assert!(scores[split..].iter().all(|v| v.is_missing()));

        let numbers: Vec<f64> = scores[..split].iter().map(|v| v.as_f64().unwrap()).collect();
        let ordered = numbers.windows(2).all(|w| if desc { w[0] >= w[1] } else { w[0] <= w[1] });
        assert!(ordered, "desc={}: {:?}", desc, &numbers[..10]);
    }
}
