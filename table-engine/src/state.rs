//! FILENAME: table-engine/src/state.rs
//! Table State - The immutable snapshot of user intent.
//!
//! This module contains every piece of state the engine derives its views from.
//! These structures are:
//! - Plain data with no behavior beyond lookups and structural copies
//! - Never mutated once committed by the table (every transition builds a new one)
//! - Serializable, except for predicate filters which only exist in memory

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use values::CellValue;

use crate::row::RowCells;

// ============================================================================
// SORTING
// ============================================================================

/// One entry of the ordered sorting list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub id: String,
    pub desc: bool,
}

impl ColumnSort {
    pub fn asc(id: impl Into<String>) -> Self {
        ColumnSort { id: id.into(), desc: false }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        ColumnSort { id: id.into(), desc: true }
    }

    pub fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

pub type SortingState = Vec<ColumnSort>;

// ============================================================================
// FILTERS
// ============================================================================

/// Predicate over a single cell value.
#[derive(Clone)]
pub struct CellPredicate(Rc<dyn Fn(&CellValue) -> bool>);

impl CellPredicate {
    pub fn new(f: impl Fn(&CellValue) -> bool + 'static) -> Self {
        CellPredicate(Rc::new(f))
    }

    pub fn test(&self, value: &CellValue) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for CellPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellPredicate(..)")
    }
}

/// Two predicates are equal only when they are the same closure instance.
impl PartialEq for CellPredicate {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Predicate over a whole row, seen through its cells.
#[derive(Clone)]
pub struct RowPredicate(Rc<dyn Fn(&RowCells<'_>) -> bool>);

impl RowPredicate {
    pub fn new(f: impl Fn(&RowCells<'_>) -> bool + 'static) -> Self {
        RowPredicate(Rc::new(f))
    }

    pub fn test(&self, row: &RowCells<'_>) -> bool {
        (self.0)(row)
    }
}

impl fmt::Debug for RowPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowPredicate(..)")
    }
}

impl PartialEq for RowPredicate {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Explicit value selection, as produced by a checkbox list of distinct values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SetFilter {
    /// Selected values, compared case-insensitively against cell tokens.
    pub values: Vec<String>,
    /// Whether blank cells pass.
    #[serde(default)]
    pub include_blanks: bool,
    /// Splits cell text into tokens (multi-valued cells). None keeps the whole text.
    #[serde(default)]
    pub separator: Option<char>,
}

impl SetFilter {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SetFilter {
            values: values.into_iter().map(Into::into).collect(),
            include_blanks: false,
            separator: None,
        }
    }

    pub fn with_blanks(mut self, include_blanks: bool) -> Self {
        self.include_blanks = include_blanks;
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }
}

/// A filter value. The matching policy is chosen by its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    /// Case-insensitive substring match on the cell's display text.
    Text(String),
    /// Explicit value selection with optional blanks.
    Set(SetFilter),
    /// Inclusive numeric range; either bound may be open.
    Range { min: Option<f64>, max: Option<f64> },
    /// Structural equality against the cell value.
    Equals(CellValue),
    #[serde(skip)]
    Cell(CellPredicate),
    #[serde(skip)]
    Row(RowPredicate),
}

impl FilterValue {
    pub fn text(s: impl Into<String>) -> Self {
        FilterValue::Text(s.into())
    }

    pub fn equals(value: impl Into<CellValue>) -> Self {
        FilterValue::Equals(value.into())
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        FilterValue::Range { min, max }
    }

    pub fn cell(f: impl Fn(&CellValue) -> bool + 'static) -> Self {
        FilterValue::Cell(CellPredicate::new(f))
    }

    pub fn row(f: impl Fn(&RowCells<'_>) -> bool + 'static) -> Self {
        FilterValue::Row(RowPredicate::new(f))
    }

    /// A filter that cannot exclude anything (blank text, unbounded range).
    pub fn is_inert(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::Range { min, max } => min.is_none() && max.is_none(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: FilterValue,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: FilterValue) -> Self {
        ColumnFilter { id: id.into(), value }
    }
}

pub type ColumnFiltersState = Vec<ColumnFilter>;

// ============================================================================
// GROUPING / EXPANSION / SELECTION
// ============================================================================

pub type GroupingState = Vec<String>;

/// Which group rows show their children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpandedState {
    /// Every expandable row is expanded.
    All,
    /// Per-row flags; missing ids are collapsed.
    Rows(FxHashMap<String, bool>),
}

impl Default for ExpandedState {
    fn default() -> Self {
        ExpandedState::Rows(FxHashMap::default())
    }
}

impl ExpandedState {
    pub fn is_expanded(&self, row_id: &str) -> bool {
        match self {
            ExpandedState::All => true,
            ExpandedState::Rows(rows) => rows.get(row_id).copied().unwrap_or(false),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ExpandedState::All)
    }

    pub fn is_none_expanded(&self) -> bool {
        match self {
            ExpandedState::All => false,
            ExpandedState::Rows(rows) => !rows.values().any(|v| *v),
        }
    }
}

pub type RowSelectionState = FxHashMap<String, bool>;

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

pub type ColumnVisibilityState = FxHashMap<String, bool>;
pub type ColumnOrderState = Vec<String>;
pub type ColumnSizingState = FxHashMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnPinningState {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

impl ColumnPinningState {
    pub fn position(&self, column_id: &str) -> Option<PinPosition> {
        if self.left.iter().any(|id| id == column_id) {
            Some(PinPosition::Left)
        } else if self.right.iter().any(|id| id == column_id) {
            Some(PinPosition::Right)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

/// Default rows per page when pagination is switched on without a size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        PaginationState {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        PaginationState { page_index, page_size }
    }
}

// ============================================================================
// MAIN STATE STRUCT
// ============================================================================

/// The complete state of a table.
/// Replacing it wholesale through `Table::set_state` is the only mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableState {
    pub sorting: SortingState,
    pub column_filters: ColumnFiltersState,
    pub global_filter: Option<FilterValue>,
    pub grouping: GroupingState,
    pub expanded: ExpandedState,
    pub row_selection: RowSelectionState,
    pub column_visibility: ColumnVisibilityState,
    pub column_order: ColumnOrderState,
    pub column_sizing: ColumnSizingState,
    pub column_pinning: ColumnPinningState,
    /// None disables pagination.
    pub pagination: Option<PaginationState>,
}

impl TableState {
    pub fn with_sorting(&self, sorting: SortingState) -> Self {
        TableState { sorting, ..self.clone() }
    }

    pub fn with_column_filters(&self, column_filters: ColumnFiltersState) -> Self {
        TableState { column_filters, ..self.clone() }
    }

    pub fn with_global_filter(&self, global_filter: Option<FilterValue>) -> Self {
        TableState { global_filter, ..self.clone() }
    }

    pub fn with_grouping(&self, grouping: GroupingState) -> Self {
        TableState { grouping, ..self.clone() }
    }

    pub fn with_expanded(&self, expanded: ExpandedState) -> Self {
        TableState { expanded, ..self.clone() }
    }

    pub fn with_row_selection(&self, row_selection: RowSelectionState) -> Self {
        TableState { row_selection, ..self.clone() }
    }

    pub fn with_column_visibility(&self, column_visibility: ColumnVisibilityState) -> Self {
        TableState { column_visibility, ..self.clone() }
    }

    pub fn with_column_order(&self, column_order: ColumnOrderState) -> Self {
        TableState { column_order, ..self.clone() }
    }

    pub fn with_column_sizing(&self, column_sizing: ColumnSizingState) -> Self {
        TableState { column_sizing, ..self.clone() }
    }

    pub fn with_column_pinning(&self, column_pinning: ColumnPinningState) -> Self {
        TableState { column_pinning, ..self.clone() }
    }

    pub fn with_pagination(&self, pagination: Option<PaginationState>) -> Self {
        TableState { pagination, ..self.clone() }
    }

    /// Returns the filter value for a column, if any.
    pub fn column_filter(&self, column_id: &str) -> Option<&FilterValue> {
        self.column_filters
            .iter()
            .find(|f| f.id == column_id)
            .map(|f| &f.value)
    }

    /// Returns the sort entry for a column and its position in the sorting list.
    pub fn column_sort(&self, column_id: &str) -> Option<(usize, &ColumnSort)> {
        self.sorting
            .iter()
            .enumerate()
            .find(|(_, s)| s.id == column_id)
    }

    pub fn is_row_selected(&self, row_id: &str) -> bool {
        self.row_selection.get(row_id).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_copy_leaves_source_untouched() {
        let base = TableState::default().with_sorting(vec![ColumnSort::asc("age")]);
        let next = base.with_grouping(vec!["department".to_string()]);

        assert!(base.grouping.is_empty());
        assert_eq!(next.sorting, base.sorting);
        assert_eq!(next.grouping, vec!["department".to_string()]);
    }

    #[test]
    fn test_predicate_equality_is_identity() {
        let a = FilterValue::cell(|v| v.is_empty());
        let b = a.clone();
        let c = FilterValue::cell(|v| v.is_empty());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_state_json_roundtrip_without_predicates() {
        let state = TableState {
            sorting: vec![ColumnSort::desc("age")],
            column_filters: vec![ColumnFilter::new(
                "department",
                FilterValue::Set(SetFilter::new(["Eng"]).with_blanks(true)),
            )],
            pagination: Some(PaginationState::new(2, 25)),
            ..TableState::default()
        };

        let json = serde_json::to_string(&state).unwrap();
        let back: TableState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_predicate_filter_does_not_serialize() {
        let state = TableState::default().with_global_filter(Some(FilterValue::row(|_| true)));
        assert!(serde_json::to_string(&state).is_err());
    }

    #[test]
    fn test_expanded_lookup() {
        let mut rows = FxHashMap::default();
        rows.insert("department:Eng".to_string(), true);
        let expanded = ExpandedState::Rows(rows);
        assert!(expanded.is_expanded("department:Eng"));
        assert!(!expanded.is_expanded("department:HR"));
        assert!(ExpandedState::All.is_expanded("anything"));
    }
}
