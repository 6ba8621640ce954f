//! FILENAME: table-engine/src/cell.rs
//! PURPOSE: One resolved value per (row, leaf column).
//! CONTEXT: Cells are created with their row and never change, with one
//! exception: the aggregate stage injects group summaries through
//! `apply_aggregated_value`. There is no general setter.

use std::cell::RefCell;

use values::CellValue;

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    column_id: String,

    /// Value read from the record, or the preset group key.
    value: CellValue,

    /// Resolution failed or did not apply to this record.
    is_placeholder: bool,

    /// Value was preset by the grouping stage rather than read from a record.
    is_preset: bool,

    /// Cell holds the key of the grouping column its row was grouped by.
    is_grouped: bool,

    /// Group summary injected by the aggregate stage.
    summary: RefCell<Option<CellValue>>,
}

impl Cell {
    pub(crate) fn resolved(column_id: impl Into<String>, value: CellValue) -> Self {
        Cell {
            column_id: column_id.into(),
            value,
            is_placeholder: false,
            is_preset: false,
            is_grouped: false,
            summary: RefCell::new(None),
        }
    }

    pub(crate) fn placeholder(column_id: impl Into<String>) -> Self {
        Cell {
            column_id: column_id.into(),
            value: CellValue::Empty,
            is_placeholder: true,
            is_preset: false,
            is_grouped: false,
            summary: RefCell::new(None),
        }
    }

    /// Group key cell. `grouped` marks the column this level groups by;
    /// ancestor keys are preset without it.
    pub(crate) fn preset(column_id: impl Into<String>, key: CellValue, grouped: bool) -> Self {
        Cell {
            column_id: column_id.into(),
            value: key,
            is_placeholder: false,
            is_preset: true,
            is_grouped: grouped,
            summary: RefCell::new(None),
        }
    }

    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    /// The injected summary if there is one, else the resolved value.
    pub fn value(&self) -> CellValue {
        match &*self.summary.borrow() {
            Some(summary) => summary.clone(),
            None => self.value.clone(),
        }
    }

    /// Like `value`, with empty values replaced by `fallback`.
    pub fn render_value(&self, fallback: &CellValue) -> CellValue {
        let value = self.value();
        if value.is_empty() {
            fallback.clone()
        } else {
            value
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.is_placeholder && self.summary.borrow().is_none()
    }

    /// True for injected summaries and preset group keys.
    pub fn is_aggregated(&self) -> bool {
        self.is_preset || self.summary.borrow().is_some()
    }

    pub fn is_grouped(&self) -> bool {
        self.is_grouped
    }

    /// Group key set by the grouping stage. Aggregation leaves these alone.
    pub(crate) fn is_preset(&self) -> bool {
        self.is_preset
    }

    /// Injects a computed group summary. Re-running aggregation overwrites it.
    pub fn apply_aggregated_value(&self, value: CellValue) {
        *self.summary.borrow_mut() = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_cleared_by_summary() {
        let cell = Cell::placeholder("salary");
        assert!(cell.is_placeholder());
        assert!(!cell.is_aggregated());

        cell.apply_aggregated_value(CellValue::Number(300.0));
        assert!(!cell.is_placeholder());
        assert!(cell.is_aggregated());
        assert_eq!(cell.value(), CellValue::Number(300.0));
    }

    #[test]
    fn test_render_value_fallback() {
        let fallback = CellValue::text("-");
        assert_eq!(Cell::placeholder("x").render_value(&fallback), fallback);
        assert_eq!(
            Cell::resolved("x", CellValue::Number(1.0)).render_value(&fallback),
            CellValue::Number(1.0)
        );
    }

    #[test]
    fn test_preset_key() {
        let cell = Cell::preset("department", CellValue::text("Eng"), true);
        assert!(cell.is_grouped());
        assert!(cell.is_aggregated());
        assert_eq!(cell.value(), CellValue::text("Eng"));
    }
}
