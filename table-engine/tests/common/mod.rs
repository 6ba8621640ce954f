//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for table-engine integration tests.

#![allow(dead_code)]

use std::sync::Once;

use simplelog::{Config, LevelFilter, TestLogger};
use table_engine::{CellValue, ColumnDef, Record, Table, TableOptions};

static LOGGER: Once = Once::new();

/// Installs the test logger once per test binary.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = TestLogger::init(LevelFilter::Debug, Config::default());
    });
}

// ============================================================================
// PEOPLE FIXTURE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub department: String,
    pub salary: f64,
}

impl Person {
    pub fn new(name: &str, age: u32, department: &str, salary: f64) -> Self {
        Person {
            name: name.to_string(),
            age,
            email: format!("{}@example.com", name.to_lowercase()),
            department: department.to_string(),
            salary,
        }
    }
}

impl Record for Person {
    fn field(&self, key: &str) -> Option<CellValue> {
        match key {
            "name" => Some(CellValue::text(&self.name)),
            "age" => Some(CellValue::from(self.age)),
            "email" => Some(CellValue::text(&self.email)),
            "department" => Some(CellValue::text(&self.department)),
            "salary" => Some(CellValue::Number(self.salary)),
            _ => None,
        }
    }
}

pub struct PeopleFixture;

impl PeopleFixture {
    /// Five people across four departments (Eng twice).
    pub fn data() -> Vec<Person> {
        vec![
            Person::new("Alice", 34, "Eng", 120_000.0),
            Person::new("Bob", 28, "Mkt", 90_000.0),
            Person::new("Carol", 45, "Sales", 85_000.0),
            Person::new("Dan", 28, "Eng", 110_000.0),
            Person::new("Eve", 39, "HR", 70_000.0),
        ]
    }

    /// `count` generated people, ages 20..60 and departments in rotation.
    pub fn generated(count: usize) -> Vec<Person> {
        const DEPARTMENTS: [&str; 4] = ["Eng", "Mkt", "Sales", "HR"];
        (0..count)
            .map(|i| {
                Person::new(
                    &format!("Person{:03}", i),
                    20 + (i % 40) as u32,
                    DEPARTMENTS[i % DEPARTMENTS.len()],
                    50_000.0 + (i as f64) * 1_000.0,
                )
            })
            .collect()
    }

    pub fn columns() -> Vec<ColumnDef<Person>> {
        vec![
            ColumnDef::accessor("name").header("Name"),
            ColumnDef::accessor("age").header("Age"),
            ColumnDef::accessor("email").header("Email"),
            ColumnDef::accessor("department").header("Department"),
            ColumnDef::accessor("salary").header("Salary"),
        ]
    }
}

// ============================================================================
// HARNESS HELPERS
// ============================================================================

pub fn people_table() -> Table<Person> {
    init_logger();
    Table::new(TableOptions::new(PeopleFixture::data(), PeopleFixture::columns()))
}

pub fn people_table_with(options: impl FnOnce(TableOptions<Person>) -> TableOptions<Person>) -> Table<Person> {
    init_logger();
    Table::new(options(TableOptions::new(
        PeopleFixture::data(),
        PeopleFixture::columns(),
    )))
}

pub fn generated_table(count: usize) -> Table<Person> {
    init_logger();
    Table::new(TableOptions::new(PeopleFixture::generated(count), PeopleFixture::columns()))
}

/// Ids of the final rows.
pub fn row_ids(table: &Table<Person>) -> Vec<String> {
    table.row_model().rows().iter().map(|r| r.id().to_string()).collect()
}

/// Values of one column over the final rows.
pub fn column_values(table: &Table<Person>, column_id: &str) -> Vec<CellValue> {
    table.row_model().rows().iter().map(|r| r.value(column_id)).collect()
}

pub fn visible_column_ids(table: &Table<Person>) -> Vec<String> {
    table
        .visible_leaf_columns()
        .iter()
        .map(|c| c.id().to_string())
        .collect()
}
