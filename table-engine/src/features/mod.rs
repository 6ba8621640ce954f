//! FILENAME: table-engine/src/features/mod.rs
//! PURPOSE: Feature hooks run by the state gateway on every transition.
//! CONTEXT: `normalize` cleans a candidate state before it is committed (drop
//! unknown column ids, clamp sizes, auto-resets). `reconcile` runs after the
//! pipeline and may adjust state that depends on derived row counts.
//! Registration is explicit: a table uses `FeatureRegistry::with_builtins()`
//! unless its options carry a registry of their own.

pub mod column_layout;
pub mod expanding;
pub mod filtering;
pub mod grouping;
pub mod pagination;
pub mod selection;
pub mod sorting;

use std::fmt;

use crate::column::ColumnCatalog;
use crate::options::FeatureFlags;
use crate::state::TableState;

pub use column_layout::ColumnLayoutFeature;
pub use expanding::ExpandingFeature;
pub use filtering::FilteringFeature;
pub use grouping::GroupingFeature;
pub use pagination::PaginationFeature;
pub use selection::SelectionFeature;
pub use sorting::SortingFeature;

/// Inputs available while normalizing a candidate state.
pub struct FeatureContext<'a> {
    /// The committed state the candidate replaces.
    pub previous: &'a TableState,
    pub flags: &'a FeatureFlags,
    pub columns: &'a ColumnCatalog,
}

/// Inputs available after the pipeline ran.
pub struct ReconcileContext<'a> {
    pub flags: &'a FeatureFlags,
    pub columns: &'a ColumnCatalog,
    /// Rows pagination pages over (visible rows or top-level rows).
    pub pageable_rows: usize,
}

pub trait TableFeature {
    fn name(&self) -> &'static str;

    fn normalize(&self, _ctx: &FeatureContext<'_>, _state: &mut TableState) {}

    fn reconcile(&self, _ctx: &ReconcileContext<'_>, _state: &mut TableState) {}
}

/// Ordered list of feature hooks owned by one table.
#[derive(Default)]
pub struct FeatureRegistry {
    features: Vec<Box<dyn TableFeature>>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        FeatureRegistry::default()
    }

    /// The built-in hooks in pipeline order.
    pub fn with_builtins() -> Self {
        FeatureRegistry::new()
            .with(ColumnLayoutFeature)
            .with(FilteringFeature)
            .with(SortingFeature)
            .with(GroupingFeature)
            .with(ExpandingFeature)
            .with(SelectionFeature)
            .with(PaginationFeature)
    }

    pub fn with(mut self, feature: impl TableFeature + 'static) -> Self {
        self.register(Box::new(feature));
        self
    }

    pub fn register(&mut self, feature: Box<dyn TableFeature>) {
        self.features.push(feature);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    pub fn normalize(&self, ctx: &FeatureContext<'_>, state: &mut TableState) {
        for feature in &self.features {
            feature.normalize(ctx, state);
        }
    }

    pub fn reconcile(&self, ctx: &ReconcileContext<'_>, state: &mut TableState) {
        for feature in &self.features {
            feature.reconcile(ctx, state);
        }
    }
}

impl fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureRegistry")
            .field("features", &self.names())
            .finish()
    }
}
