//! FILENAME: table-engine/src/features/column_layout.rs
//! PURPOSE: Visible leaf ordering (order, grouped-column mode, pinning,
//! visibility) and normalization of the column layout state.
//! CONTEXT: The table recomputes the layout only when `layout_inputs_changed`
//! says so; headers are rebuilt from the result.

use rustc_hash::FxHashSet;

use crate::column::{dedupe_ids, ColumnTree};
use crate::features::{FeatureContext, TableFeature};
use crate::options::{FeatureFlags, GroupedColumnMode};
use crate::state::{ColumnPinningState, PinPosition, TableState};

// ============================================================================
// LAYOUT
// ============================================================================

/// Visible leaf columns split by pin region, as indices into
/// `ColumnTree::all_columns`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    pub left: Vec<usize>,
    pub center: Vec<usize>,
    pub right: Vec<usize>,
}

impl ColumnLayout {
    /// Left, center, right.
    pub fn all(&self) -> impl Iterator<Item = usize> + '_ {
        self.left
            .iter()
            .chain(self.center.iter())
            .chain(self.right.iter())
            .copied()
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.center.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Leaves in `column_order` (group ids expand to their leaves), then the rest
/// in declaration order.
pub fn ordered_leaves<T>(tree: &ColumnTree<T>, state: &TableState) -> Vec<usize> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::with_capacity(tree.leaf_count());
    let explicit = state
        .column_order
        .iter()
        .filter_map(|id| tree.get(id))
        .flat_map(|c| c.leaf_ids().iter());
    let declared = tree.leaf_columns().map(|c| c.id()).collect::<Vec<_>>();
    for id in explicit.map(String::as_str).chain(declared.into_iter()) {
        if let Some(column) = tree.get(id) {
            if seen.insert(column.index()) {
                out.push(column.index());
            }
        }
    }
    out
}

pub fn compute_layout<T>(tree: &ColumnTree<T>, state: &TableState, flags: &FeatureFlags) -> ColumnLayout {
    let mut order = ordered_leaves(tree, state);

    let grouped: Vec<usize> = state
        .grouping
        .iter()
        .filter_map(|id| tree.get(id))
        .map(|c| c.index())
        .collect();
    match flags.grouped_column_mode {
        GroupedColumnMode::Keep => {}
        GroupedColumnMode::Reorder => {
            order.retain(|i| !grouped.contains(i));
            let mut reordered = grouped.clone();
            reordered.extend(order);
            order = reordered;
        }
        GroupedColumnMode::Remove => order.retain(|i| !grouped.contains(i)),
    }

    let visible = |i: &usize| tree.at(*i).is_some_and(|c| c.is_visible(state));
    let pinning = &state.column_pinning;
    let pinned_side = |ids: &[String]| -> Vec<usize> {
        ids.iter()
            .filter_map(|id| tree.get(id))
            .flat_map(|c| c.leaf_ids().iter().filter_map(|leaf| tree.get(leaf)))
            .map(|c| c.index())
            .filter(|i| order.contains(i))
            .filter(visible)
            .collect()
    };

    let (mut left, mut right) = if flags.enable_column_pinning {
        (pinned_side(&pinning.left), pinned_side(&pinning.right))
    } else {
        (Vec::new(), Vec::new())
    };
    dedupe_indices(&mut left);
    right.retain(|i| !left.contains(i));
    dedupe_indices(&mut right);

    let center = order
        .iter()
        .copied()
        .filter(|i| !left.contains(i) && !right.contains(i))
        .filter(visible)
        .collect();

    ColumnLayout { left, center, right }
}

fn dedupe_indices(indices: &mut Vec<usize>) {
    let mut seen = FxHashSet::default();
    indices.retain(|i| seen.insert(*i));
}

/// Whether a transition from `previous` to `next` changes the visible columns.
pub fn layout_inputs_changed(previous: &TableState, next: &TableState, flags: &FeatureFlags) -> bool {
    previous.column_visibility != next.column_visibility
        || previous.column_order != next.column_order
        || previous.column_pinning != next.column_pinning
        || (flags.grouped_column_mode != GroupedColumnMode::Keep
            && previous.grouping != next.grouping)
}

// ============================================================================
// FEATURE HOOK
// ============================================================================

/// Drops unknown ids from visibility, order, sizing and pinning. Refuses to
/// hide unhideable columns, drops invalid widths, and un-pins a column listed
/// on both sides (left wins).
pub struct ColumnLayoutFeature;

impl TableFeature for ColumnLayoutFeature {
    fn name(&self) -> &'static str {
        "column_layout"
    }

    fn normalize(&self, ctx: &FeatureContext<'_>, state: &mut TableState) {
        let columns = ctx.columns;

        state
            .column_visibility
            .retain(|id, visible| columns.allows(id, |c| c.is_leaf && (*visible || c.can_hide)));

        state.column_order.retain(|id| columns.contains(id));
        dedupe_ids(&mut state.column_order);

        state.column_sizing.retain(|id, width| {
            width.is_finite() && *width >= 0.0 && columns.allows(id, |c| c.is_leaf && c.can_resize)
        });

        let pinning = &mut state.column_pinning;
        if !ctx.flags.enable_column_pinning {
            pinning.left.clear();
            pinning.right.clear();
        }
        pinning.left.retain(|id| columns.allows(id, |c| c.can_pin));
        pinning.right.retain(|id| columns.allows(id, |c| c.can_pin));
        dedupe_ids(&mut pinning.left);
        dedupe_ids(&mut pinning.right);
        let left = pinning.left.clone();
        pinning.right.retain(|id| !left.contains(id));
    }
}

/// Pin list after moving `ids` to `position` (or un-pinning them).
pub fn pinned(state: &TableState, ids: &[String], position: Option<PinPosition>) -> ColumnPinningState {
    let mut pinning = state.column_pinning.clone();
    pinning.left.retain(|id| !ids.contains(id));
    pinning.right.retain(|id| !ids.contains(id));
    match position {
        Some(PinPosition::Left) => pinning.left.extend(ids.iter().cloned()),
        Some(PinPosition::Right) => pinning.right.extend(ids.iter().cloned()),
        None => {}
    }
    pinning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDef;
    use crate::options::ColumnDefaults;
    use values::{CellValue, Record};

    struct Item;

    impl Record for Item {
        fn field(&self, _key: &str) -> Option<CellValue> {
            None
        }
    }

    fn tree() -> ColumnTree<Item> {
        ColumnTree::build(
            &[
                ColumnDef::accessor("a"),
                ColumnDef::group("G", vec![ColumnDef::accessor("b"), ColumnDef::accessor("c")]),
                ColumnDef::accessor("d"),
            ],
            ColumnDefaults::default(),
        )
    }

    fn ids(tree: &ColumnTree<Item>, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|i| tree.at(*i).unwrap().id().to_string())
            .collect()
    }

    #[test]
    fn test_order_expands_group_ids() {
        let tree = tree();
        let state = TableState {
            column_order: vec!["d".to_string(), "column_1".to_string()],
            ..TableState::default()
        };
        let order = ordered_leaves(&tree, &state);
        assert_eq!(ids(&tree, &order), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_pinning_splits_regions() {
        let tree = tree();
        let mut state = TableState::default();
        state.column_pinning.left = vec!["d".to_string()];
        state.column_pinning.right = vec!["a".to_string()];
        let layout = compute_layout(&tree, &state, &FeatureFlags::default());
        assert_eq!(ids(&tree, &layout.left), vec!["d"]);
        assert_eq!(ids(&tree, &layout.center), vec!["b", "c"]);
        assert_eq!(ids(&tree, &layout.right), vec!["a"]);
    }

    #[test]
    fn test_grouped_column_modes() {
        let tree = tree();
        let state = TableState::default().with_grouping(vec!["c".to_string()]);

        let reorder = FeatureFlags {
            grouped_column_mode: GroupedColumnMode::Reorder,
            ..FeatureFlags::default()
        };
        let layout = compute_layout(&tree, &state, &reorder);
        assert_eq!(ids(&tree, &layout.center), vec!["c", "a", "b", "d"]);

        let remove = FeatureFlags {
            grouped_column_mode: GroupedColumnMode::Remove,
            ..FeatureFlags::default()
        };
        let layout = compute_layout(&tree, &state, &remove);
        assert_eq!(ids(&tree, &layout.center), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_hidden_columns_leave_layout() {
        let tree = tree();
        let mut state = TableState::default();
        state.column_visibility.insert("b".to_string(), false);
        let layout = compute_layout(&tree, &state, &FeatureFlags::default());
        assert_eq!(ids(&tree, &layout.center), vec!["a", "c", "d"]);
    }
}
