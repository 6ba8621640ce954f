//! FILENAME: table-engine/src/features/sorting.rs
//! PURPOSE: Sorting functions, the sort toggle cycle and sorting normalization.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use values::CellValue;

use crate::column::Column;
use crate::features::{FeatureContext, TableFeature};
use crate::options::FeatureFlags;
use crate::state::{ColumnSort, SortDirection, SortingState, TableState};

// ============================================================================
// SORTING FUNCTIONS
// ============================================================================

pub type CustomSortingFn = Rc<dyn Fn(&CellValue, &CellValue) -> Ordering>;

/// Comparator used for a column's values.
#[derive(Clone, Default)]
pub enum SortingFn {
    /// `CellValue::compare`: numbers numerically, text by code point.
    #[default]
    Basic,
    /// Case-insensitive text comparison.
    Text,
    /// Natural order: digit runs compare as numbers ("item2" < "item10").
    Alphanumeric,
    Custom(CustomSortingFn),
}

impl SortingFn {
    pub fn custom(f: impl Fn(&CellValue, &CellValue) -> Ordering + 'static) -> Self {
        SortingFn::Custom(Rc::new(f))
    }

    pub fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        match self {
            SortingFn::Basic => a.compare(b),
            SortingFn::Text => match (a, b) {
                (CellValue::Text(x), CellValue::Text(y)) => {
                    x.to_lowercase().cmp(&y.to_lowercase())
                }
                _ => a.compare(b),
            },
            SortingFn::Alphanumeric => match (a, b) {
                (CellValue::Number(_), CellValue::Number(_)) => a.compare(b),
                _ => compare_alphanumeric(&a.display_value(), &b.display_value()),
            },
            SortingFn::Custom(f) => f(a, b),
        }
    }
}

impl fmt::Debug for SortingFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortingFn::Basic => f.write_str("Basic"),
            SortingFn::Text => f.write_str("Text"),
            SortingFn::Alphanumeric => f.write_str("Alphanumeric"),
            SortingFn::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Splits both strings into digit and non-digit runs; digit runs compare by
/// numeric value, other runs case-insensitively.
pub fn compare_alphanumeric(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u128>(), y.parse::<u128>()) {
                    (Ok(nx), Ok(ny)) => nx.cmp(&ny).then_with(|| x.len().cmp(&y.len())),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.to_lowercase().cmp(&y.to_lowercase()),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Chunks { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map_or(self.rest.len(), |(i, _)| i);
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}

/// Compares two values for one sort entry. Empty values and NaN go last in
/// both directions.
pub fn compare_for_sort(
    a: &CellValue,
    b: &CellValue,
    sorting_fn: &SortingFn,
    desc: bool,
    invert: bool,
) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }
    let mut ord = sorting_fn.compare(a, b);
    if invert {
        ord = ord.reverse();
    }
    if desc {
        ord = ord.reverse();
    }
    ord
}

// ============================================================================
// TOGGLE CYCLE
// ============================================================================

/// Next direction for `column` given its current entry:
/// first -> opposite -> removed (or back to first without removal).
fn next_direction(
    current: Option<SortDirection>,
    first: SortDirection,
    flags: &FeatureFlags,
) -> Option<SortDirection> {
    match current {
        None => Some(first),
        Some(dir) if dir == first => Some(opposite(first)),
        Some(_) if flags.enable_sorting_removal => None,
        Some(_) => Some(first),
    }
}

fn opposite(direction: SortDirection) -> SortDirection {
    match direction {
        SortDirection::Asc => SortDirection::Desc,
        SortDirection::Desc => SortDirection::Asc,
    }
}

/// Sorting list after toggling `column`. Single-sort mode replaces every other
/// entry; multi-sort mode edits only this column's entry.
pub fn toggled_sorting<T>(
    sorting: &SortingState,
    column: &Column<T>,
    flags: &FeatureFlags,
    multi: bool,
) -> SortingState {
    if !column.can_sort(flags) {
        return sorting.clone();
    }
    let existing = sorting.iter().position(|s| s.id == column.id());
    let current = existing.map(|i| sorting[i].direction());
    let next = next_direction(current, column.first_sort_direction(), flags);
    let entry = |dir: SortDirection| ColumnSort {
        id: column.id().to_string(),
        desc: dir == SortDirection::Desc,
    };

    if !(multi && flags.enable_multi_sort) {
        return next.map(|dir| vec![entry(dir)]).unwrap_or_default();
    }

    let mut out = sorting.clone();
    match (existing, next) {
        (Some(i), Some(dir)) => out[i] = entry(dir),
        (Some(i), None) => {
            out.remove(i);
        }
        (None, Some(dir)) => {
            out.push(entry(dir));
            if let Some(max) = flags.max_multi_sort_col_count {
                let excess = out.len().saturating_sub(max);
                out.drain(..excess);
            }
        }
        (None, None) => {}
    }
    out
}

// ============================================================================
// FEATURE HOOK
// ============================================================================

/// Drops unknown and unsortable ids, duplicates, and entries beyond the
/// multi-sort cap (oldest first).
pub struct SortingFeature;

impl TableFeature for SortingFeature {
    fn name(&self) -> &'static str {
        "sorting"
    }

    fn normalize(&self, ctx: &FeatureContext<'_>, state: &mut TableState) {
        if !ctx.flags.enable_sorting {
            state.sorting.clear();
            return;
        }
        state
            .sorting
            .retain(|s| ctx.columns.allows(&s.id, |c| c.can_sort));

        let mut seen = FxHashSet::default();
        state.sorting.retain(|s| seen.insert(s.id.clone()));

        if let Some(max) = ctx.flags.max_multi_sort_col_count {
            let excess = state.sorting.len().saturating_sub(max);
            state.sorting.drain(..excess);
        }
    }
}
