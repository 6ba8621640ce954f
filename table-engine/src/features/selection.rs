//! FILENAME: table-engine/src/features/selection.rs
//! PURPOSE: Row-selection normalization.

use std::cmp::Ordering;

use crate::features::sorting::compare_alphanumeric;
use crate::features::{FeatureContext, TableFeature};
use crate::state::TableState;

/// Keeps only `true` entries. Single-selection mode keeps the newly selected
/// row (the first new id in natural order if several were added at once).
pub struct SelectionFeature;

impl TableFeature for SelectionFeature {
    fn name(&self) -> &'static str {
        "selection"
    }

    fn normalize(&self, ctx: &FeatureContext<'_>, state: &mut TableState) {
        if !ctx.flags.enable_row_selection {
            state.row_selection.clear();
            return;
        }
        state.row_selection.retain(|_, selected| *selected);

        if ctx.flags.enable_multi_row_selection || state.row_selection.len() <= 1 {
            return;
        }
        let previous = &ctx.previous.row_selection;
        let keep = state
            .row_selection
            .keys()
            .filter(|id| !previous.get(*id).copied().unwrap_or(false))
            .min_by(|a, b| natural_order(a, b))
            .or_else(|| state.row_selection.keys().min_by(|a, b| natural_order(a, b)))
            .cloned();
        state.row_selection.retain(|id, _| Some(id) == keep.as_ref());
    }
}

fn natural_order(a: &str, b: &str) -> Ordering {
    compare_alphanumeric(a, b).then_with(|| a.cmp(b))
}
