//! FILENAME: table-engine/src/features/expanding.rs
//! PURPOSE: Expanded-state normalization.

use crate::features::{FeatureContext, TableFeature};
use crate::state::{ExpandedState, TableState};

/// Keeps only `true` flags. Clears expansion when expanding is disabled, and
/// on grouping changes when `auto_reset_expanded` is set.
pub struct ExpandingFeature;

impl TableFeature for ExpandingFeature {
    fn name(&self) -> &'static str {
        "expanding"
    }

    fn normalize(&self, ctx: &FeatureContext<'_>, state: &mut TableState) {
        let grouping_changed = state.grouping != ctx.previous.grouping;
        if !ctx.flags.enable_expanding || (ctx.flags.auto_reset_expanded && grouping_changed) {
            state.expanded = ExpandedState::default();
            return;
        }
        if let ExpandedState::Rows(rows) = &mut state.expanded {
            rows.retain(|_, expanded| *expanded);
        }
    }
}
