//! FILENAME: table-engine/src/options.rs
//! Table Options - Construction-time configuration.
//!
//! `FeatureFlags` and `ColumnDefaults` are plain serializable config (a host may
//! load them from JSON). `TableOptions` bundles them with the data, the column
//! declarations and the callbacks that cannot be serialized.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use values::CellValue;

use crate::aggregation::AggregationProvider;
use crate::column::ColumnDef;
use crate::features::FeatureRegistry;
use crate::resolve::ResolveFailure;
use crate::state::TableState;

// ============================================================================
// FEATURE FLAGS
// ============================================================================

/// What happens to grouped columns in the visible column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupedColumnMode {
    /// Grouped columns keep their position.
    #[default]
    Keep,
    /// Grouped columns move to the front, in grouping order.
    Reorder,
    /// Grouped columns are hidden.
    Remove,
}

/// Table-wide feature switches. Column definitions can further disable
/// sorting, filtering, grouping, resizing and hiding per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub enable_sorting: bool,

    /// Whether toggling a sort keeps the other sorted columns.
    pub enable_multi_sort: bool,

    /// Upper bound on the sorting list length in multi-sort mode.
    pub max_multi_sort_col_count: Option<usize>,

    /// Whether the sort cycle passes through "unsorted".
    pub enable_sorting_removal: bool,

    pub enable_column_filters: bool,

    pub enable_global_filter: bool,

    pub enable_grouping: bool,

    pub enable_expanding: bool,

    pub enable_row_selection: bool,

    pub enable_multi_row_selection: bool,

    /// Selecting a group row selects its leaf rows.
    pub enable_sub_row_selection: bool,

    pub enable_pagination: bool,

    /// Page over the visible expanded rows (true) or over top-level rows only.
    pub paginate_expanded_rows: bool,

    pub enable_column_resizing: bool,

    pub enable_hiding: bool,

    pub enable_column_pinning: bool,

    /// Jump back to the first page when filters, sorting or grouping change.
    pub auto_reset_page_index: bool,

    /// Collapse everything when grouping changes.
    pub auto_reset_expanded: bool,

    pub grouped_column_mode: GroupedColumnMode,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        FeatureFlags {
            enable_sorting: true,
            enable_multi_sort: false,
            max_multi_sort_col_count: None,
            enable_sorting_removal: true,
            enable_column_filters: true,
            enable_global_filter: true,
            enable_grouping: true,
            enable_expanding: true,
            enable_row_selection: true,
            enable_multi_row_selection: true,
            enable_sub_row_selection: true,
            enable_pagination: true,
            paginate_expanded_rows: true,
            enable_column_resizing: true,
            enable_hiding: true,
            enable_column_pinning: true,
            auto_reset_page_index: true,
            auto_reset_expanded: false,
            grouped_column_mode: GroupedColumnMode::Keep,
        }
    }
}

// ============================================================================
// COLUMN DEFAULTS
// ============================================================================

/// Width used when a column declares neither a width nor a size.
pub const DEFAULT_COLUMN_SIZE: f64 = 150.0;

/// Lower clamp applied when a column declares no minimum.
pub const DEFAULT_MIN_COLUMN_SIZE: f64 = 40.0;

/// Size fallbacks applied to every column that leaves them undeclared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDefaults {
    pub size: f64,
    pub min_size: f64,
    pub max_size: Option<f64>,
}

impl Default for ColumnDefaults {
    fn default() -> Self {
        ColumnDefaults {
            size: DEFAULT_COLUMN_SIZE,
            min_size: DEFAULT_MIN_COLUMN_SIZE,
            max_size: None,
        }
    }
}

// ============================================================================
// TABLE OPTIONS
// ============================================================================

pub type RowIdFn<T> = Rc<dyn Fn(&T, usize) -> String>;
pub type StateChangeFn = Box<dyn FnMut(&TableState)>;
pub type ResolveErrorFn = Box<dyn FnMut(&ResolveFailure)>;

/// Everything a `Table` is constructed from.
pub struct TableOptions<T> {
    pub data: Vec<T>,
    pub columns: Vec<ColumnDef<T>>,
    pub initial_state: TableState,
    pub features: FeatureFlags,
    pub column_defaults: ColumnDefaults,

    /// Shown by `Cell::render_value` in place of an empty value.
    pub render_fallback_value: CellValue,

    /// Derives row ids from records. Defaults to the stringified input index.
    pub get_row_id: Option<RowIdFn<T>>,

    /// External aggregation collaborator, consulted before column aggregation functions.
    pub aggregation_provider: Option<Rc<dyn AggregationProvider>>,

    /// Feature hooks to register. Defaults to `FeatureRegistry::with_builtins()`.
    pub registry: Option<FeatureRegistry>,

    /// Host data attached to the table (JSON object).
    pub meta: serde_json::Map<String, serde_json::Value>,

    pub on_state_change: Option<StateChangeFn>,
    pub on_resolve_error: Option<ResolveErrorFn>,
}

impl<T> TableOptions<T> {
    pub fn new(data: Vec<T>, columns: Vec<ColumnDef<T>>) -> Self {
        TableOptions {
            data,
            columns,
            initial_state: TableState::default(),
            features: FeatureFlags::default(),
            column_defaults: ColumnDefaults::default(),
            render_fallback_value: CellValue::Empty,
            get_row_id: None,
            aggregation_provider: None,
            registry: None,
            meta: serde_json::Map::new(),
            on_state_change: None,
            on_resolve_error: None,
        }
    }

    pub fn with_state(mut self, state: TableState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn with_column_defaults(mut self, defaults: ColumnDefaults) -> Self {
        self.column_defaults = defaults;
        self
    }

    pub fn with_render_fallback(mut self, value: impl Into<CellValue>) -> Self {
        self.render_fallback_value = value.into();
        self
    }

    pub fn with_row_id(mut self, f: impl Fn(&T, usize) -> String + 'static) -> Self {
        self.get_row_id = Some(Rc::new(f));
        self
    }

    pub fn with_aggregation_provider(mut self, provider: Rc<dyn AggregationProvider>) -> Self {
        self.aggregation_provider = Some(provider);
        self
    }

    pub fn with_registry(mut self, registry: FeatureRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    pub fn on_state_change(mut self, f: impl FnMut(&TableState) + 'static) -> Self {
        self.on_state_change = Some(Box::new(f));
        self
    }

    pub fn on_resolve_error(mut self, f: impl FnMut(&ResolveFailure) + 'static) -> Self {
        self.on_resolve_error = Some(Box::new(f));
        self
    }
}

impl<T> fmt::Debug for TableOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("rows", &self.data.len())
            .field("columns", &self.columns.len())
            .field("initial_state", &self.initial_state)
            .field("features", &self.features)
            .field("column_defaults", &self.column_defaults)
            .finish_non_exhaustive()
    }
}
