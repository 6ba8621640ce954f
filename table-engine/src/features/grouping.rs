//! FILENAME: table-engine/src/features/grouping.rs
//! PURPOSE: Group row ids and grouping-state normalization.

use rustc_hash::FxHashSet;
use values::CellValue;

use crate::column::dedupe_ids;
use crate::features::{FeatureContext, TableFeature};
use crate::state::TableState;

/// Separator between nesting levels of a group row id.
pub const GROUP_ID_SEPARATOR: char = '>';

/// `"{column}:{key}"` at the top level, `"{parent}>{column}:{key}"` below it.
pub fn group_row_id(parent_id: Option<&str>, column_id: &str, key: &CellValue) -> String {
    match parent_id {
        Some(parent) => format!(
            "{}{}{}:{}",
            parent,
            GROUP_ID_SEPARATOR,
            column_id,
            key.display_value()
        ),
        None => format!("{}:{}", column_id, key.display_value()),
    }
}

/// Makes `id` unique among `taken` by appending `#n`.
/// Distinct keys can share a display form (`1` and `"1"`).
pub fn unique_group_id(id: String, taken: &mut FxHashSet<String>) -> String {
    if taken.insert(id.clone()) {
        return id;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}#{}", id, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Drops unknown, ungroupable and duplicate ids. Disabled grouping clears it.
pub struct GroupingFeature;

impl TableFeature for GroupingFeature {
    fn name(&self) -> &'static str {
        "grouping"
    }

    fn normalize(&self, ctx: &FeatureContext<'_>, state: &mut TableState) {
        if !ctx.flags.enable_grouping {
            state.grouping.clear();
            return;
        }
        state
            .grouping
            .retain(|id| ctx.columns.allows(id, |c| c.can_group));
        dedupe_ids(&mut state.grouping);
    }
}
