//! FILENAME: table-engine/src/features/filtering.rs
//! PURPOSE: Filter matching policies and filter-state normalization.
//! CONTEXT: The filter stage asks `matches_column_filter` per filtered column
//! and `matches_global_filter` once per row. Matching is chosen by the shape
//! of the `FilterValue`.

use rustc_hash::FxHashSet;
use values::CellValue;

use crate::cell::Cell;
use crate::features::{FeatureContext, TableFeature};
use crate::row::RowCells;
use crate::state::{FilterValue, SetFilter, TableState};

// ============================================================================
// MATCHING
// ============================================================================

/// Case-insensitive substring test against the display text.
/// `needle` must already be lowercase.
pub fn contains_text(value: &CellValue, needle: &str) -> bool {
    value.display_value().to_lowercase().contains(needle)
}

pub fn matches_set(value: &CellValue, set: &SetFilter) -> bool {
    if value.is_blank() {
        return set.include_blanks;
    }
    if set.values.is_empty() {
        return false;
    }
    let text = value.display_value();
    let selected: FxHashSet<String> = set.values.iter().map(|v| v.trim().to_lowercase()).collect();
    let selected_token = |token: &str| selected.contains(&token.trim().to_lowercase());
    match set.separator {
        Some(sep) => text.split(sep).any(selected_token),
        None => selected_token(&text),
    }
}

pub fn matches_range(value: &CellValue, min: Option<f64>, max: Option<f64>) -> bool {
    let Some(n) = value.as_f64().filter(|n| !n.is_nan()) else {
        return false;
    };
    min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
}

/// Column filter test for one cell. Row predicates see the whole row.
pub fn matches_column_filter(value: &CellValue, filter: &FilterValue, row: &RowCells<'_>) -> bool {
    match filter {
        FilterValue::Text(s) if s.is_empty() => true,
        FilterValue::Text(s) => contains_text(value, &s.to_lowercase()),
        FilterValue::Set(set) => matches_set(value, set),
        FilterValue::Range { min, max } => matches_range(value, *min, *max),
        FilterValue::Equals(expected) => value == expected,
        FilterValue::Cell(predicate) => predicate.test(value),
        FilterValue::Row(predicate) => predicate.test(row),
    }
}

/// Global filter test. Text and cell-shaped filters pass when any searchable
/// cell matches; row predicates see the whole row.
pub fn matches_global_filter<'c>(
    filter: &FilterValue,
    mut searchable: impl Iterator<Item = &'c Cell>,
    row: &RowCells<'_>,
) -> bool {
    match filter {
        FilterValue::Row(predicate) => predicate.test(row),
        FilterValue::Text(s) if s.is_empty() => true,
        FilterValue::Text(s) => {
            let needle = s.to_lowercase();
            searchable.any(|cell| contains_text(&cell.value(), &needle))
        }
        other => searchable.any(|cell| matches_column_filter(&cell.value(), other, row)),
    }
}

// ============================================================================
// FEATURE HOOK
// ============================================================================

/// Drops filters on unknown or unfilterable columns, duplicates (first wins)
/// and filters that cannot exclude anything. A blank global filter becomes None.
pub struct FilteringFeature;

impl TableFeature for FilteringFeature {
    fn name(&self) -> &'static str {
        "filtering"
    }

    fn normalize(&self, ctx: &FeatureContext<'_>, state: &mut TableState) {
        let mut seen = FxHashSet::default();
        state.column_filters.retain(|f| {
            ctx.columns.allows(&f.id, |c| c.is_leaf)
                && !f.value.is_inert()
                && seen.insert(f.id.clone())
        });
        if ctx.flags.enable_column_filters {
            state
                .column_filters
                .retain(|f| ctx.columns.allows(&f.id, |c| c.can_filter));
        }

        if state.global_filter.as_ref().is_some_and(FilterValue::is_inert) {
            state.global_filter = None;
        }
    }
}
