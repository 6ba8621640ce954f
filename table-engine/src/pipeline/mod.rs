//! FILENAME: table-engine/src/pipeline/mod.rs
//! Row-Model Pipeline - The fixed derivation from records to rendered rows.
//!
//! Stages, each a pure function of (state, previous model):
//! 1. Core: one row per record, cells resolved
//! 2. Filter: column filters AND global filter AND quick filter
//! 3. Sort: stable multi-key sort
//! 4. Group: recursive partition into synthetic group rows
//! 5. Aggregate: inject group summaries into group-row cells
//! 6. Expand: visible depth-first walk of the group tree
//! 7. Paginate: slice the visible rows to the current page
//!
//! A state transition is classified into the earliest stage it invalidates
//! (`RefreshStage`); only that stage and the ones after it re-run. Running
//! `Everything` always gives the same result as the narrower path.

pub mod aggregated;
pub mod core_rows;
pub mod expanded;
pub mod filtered;
pub mod grouped;
pub mod paginated;
pub mod sorted;

use std::rc::Rc;

use values::Record;

use crate::aggregation::AggregationProvider;
use crate::column::ColumnTree;
use crate::logging::{log_debug, log_enter, log_exit};
use crate::options::{FeatureFlags, RowIdFn};
use crate::resolve::ResolveLog;
use crate::row_model::{ModelRef, RowModel};
use crate::state::TableState;

// ============================================================================
// REFRESH CLASSIFICATION
// ============================================================================

/// Earliest stage a change invalidates. Ordered: earlier stages compare less,
/// so combining two classifications takes the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RefreshStage {
    Everything,
    Filter,
    Sort,
    Group,
    Aggregate,
    /// Expansion and pagination only.
    Map,
    Nothing,
}

impl RefreshStage {
    /// Classifies a state transition.
    pub fn classify(previous: &TableState, next: &TableState) -> RefreshStage {
        if previous.column_filters != next.column_filters || previous.global_filter != next.global_filter {
            RefreshStage::Filter
        } else if previous.sorting != next.sorting {
            RefreshStage::Sort
        } else if previous.grouping != next.grouping {
            RefreshStage::Group
        } else if previous.expanded != next.expanded || previous.pagination != next.pagination {
            RefreshStage::Map
        } else {
            RefreshStage::Nothing
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshModelParams {
    pub stage: RefreshStage,
}

impl RefreshModelParams {
    pub fn new(stage: RefreshStage) -> Self {
        RefreshModelParams { stage }
    }

    /// Keeps the earlier of the two stages.
    pub fn merge(self, stage: RefreshStage) -> Self {
        RefreshModelParams {
            stage: self.stage.min(stage),
        }
    }

    fn runs(&self, stage: RefreshStage) -> bool {
        self.stage <= stage
    }
}

// ============================================================================
// STAGE CONTEXT
// ============================================================================

/// Everything a stage may read.
pub struct StageContext<'a, T> {
    pub state: &'a TableState,
    pub flags: &'a FeatureFlags,
    pub tree: &'a ColumnTree<T>,
    pub data: &'a [Rc<T>],
    pub get_row_id: Option<&'a RowIdFn<T>>,
    pub quick_filter: Option<&'a str>,
    pub aggregation_provider: Option<&'a dyn AggregationProvider>,
}

impl<T> StageContext<'_, T> {
    /// Grouping ids that the group stage acts on.
    pub fn active_grouping(&self) -> &[String] {
        if self.flags.enable_grouping {
            self.state.grouping.as_slice()
        } else {
            &[]
        }
    }
}

// ============================================================================
// ROW MODEL FAMILY
// ============================================================================

/// Output of every stage, retained together so consumers can inspect any of
/// them. Passthrough stages share the previous stage's model.
pub struct RowModels<T> {
    pub core: ModelRef<T>,
    pub filtered: ModelRef<T>,
    pub sorted: ModelRef<T>,
    pub grouped: ModelRef<T>,
    pub aggregated: ModelRef<T>,
    pub expanded: ModelRef<T>,
    pub paginated: ModelRef<T>,
}

impl<T> Default for RowModels<T> {
    fn default() -> Self {
        let empty: ModelRef<T> = Rc::new(RowModel::empty());
        RowModels {
            core: Rc::clone(&empty),
            filtered: Rc::clone(&empty),
            sorted: Rc::clone(&empty),
            grouped: Rc::clone(&empty),
            aggregated: Rc::clone(&empty),
            expanded: Rc::clone(&empty),
            paginated: empty,
        }
    }
}

impl<T: Record> RowModels<T> {
    /// Re-runs `params.stage` and every stage after it.
    pub fn run(&mut self, params: RefreshModelParams, ctx: &StageContext<'_, T>, log: &mut ResolveLog) {
        if params.stage == RefreshStage::Nothing {
            return;
        }
        log_enter!("PIPELINE", "run", "from {:?}", params.stage);

        if params.runs(RefreshStage::Everything) {
            self.core = Rc::new(core_rows::build(ctx, log));
        }
        if params.runs(RefreshStage::Filter) {
            self.filtered = filtered::run(&self.core, ctx);
        }
        if params.runs(RefreshStage::Sort) {
            self.sorted = sorted::run(&self.filtered, ctx);
        }
        if params.runs(RefreshStage::Group) {
            self.grouped = grouped::run(&self.sorted, ctx);
        }
        if params.runs(RefreshStage::Aggregate) {
            self.aggregated = aggregated::run(&self.grouped, ctx);
        }
        if params.runs(RefreshStage::Map) {
            self.expanded = expanded::run(&self.aggregated, ctx);
            self.paginated = paginated::run(&self.expanded, ctx);
        }

        log_exit!(
            "PIPELINE",
            "run",
            "core={} filtered={} grouped={} visible={} page={}",
            self.core.len(),
            self.filtered.len(),
            self.grouped.flat_rows().len(),
            self.expanded.len(),
            self.paginated.len()
        );
    }
}

impl<T> RowModels<T> {
    /// Clears display indexes everywhere, then numbers the final rows.
    /// `root_display_index` counts top-level rows only.
    pub fn assign_display_indexes(&self) {
        for row in self.core.flat_rows().iter().chain(self.aggregated.flat_rows()) {
            row.set_display_index(None, None);
        }
        let mut root = 0;
        for (i, row) in self.paginated.rows().iter().enumerate() {
            let root_index = (row.depth() == 0).then(|| {
                root += 1;
                root - 1
            });
            row.set_display_index(Some(i), root_index);
        }
        log_debug!("PIPELINE", "assigned {} display indexes", self.paginated.len());
    }
}
