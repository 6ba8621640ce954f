//! FILENAME: table-engine/src/table.rs
//! PURPOSE: The table instance: owns data, columns, state and the row-model
//! family, and exposes the read surface and the state mutation gateway.
//! CONTEXT: Every mutation builds a candidate `TableState` and hands it to
//! `set_state`. The gateway normalizes it through the feature hooks,
//! classifies the transition, rebuilds the column layout when its inputs
//! changed, re-runs the pipeline suffix, lets hooks reconcile state that
//! depends on row counts, and finally notifies the host.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use values::{CellValue, FromCellValue, Record};

use crate::aggregation::AggregationProvider;
use crate::cell::Cell;
use crate::column::{Column, ColumnCatalog, ColumnTree};
use crate::features::column_layout::{compute_layout, layout_inputs_changed, ordered_leaves, pinned, ColumnLayout};
use crate::features::pagination::page_count;
use crate::features::sorting::toggled_sorting;
use crate::features::{FeatureContext, FeatureRegistry, ReconcileContext};
use crate::header::{build_footer_groups, build_header_groups, HeaderGroup, HeaderLabel};
use crate::logging::{log_debug, log_enter, log_exit, log_info};
use crate::options::{FeatureFlags, RowIdFn, StateChangeFn, TableOptions};
use crate::pipeline::paginated::pageable_count;
use crate::pipeline::{RefreshModelParams, RefreshStage, RowModels, StageContext};
use crate::resolve::{call_accessor, ResolveFailure, ResolveLog};
use crate::row::RowRef;
use crate::row_model::RowModel;
use crate::state::{
    ColumnFilter, ColumnOrderState, ColumnPinningState, ColumnSizingState, ColumnVisibilityState, ExpandedState,
    FilterValue, GroupingState, PaginationState, PinPosition, RowSelectionState, SortingState, TableState,
};

pub struct Table<T> {
    data: Vec<Rc<T>>,
    tree: ColumnTree<T>,
    catalog: ColumnCatalog,
    layout: ColumnLayout,
    header_groups: Vec<HeaderGroup>,
    footer_groups: Vec<HeaderGroup>,

    state: TableState,
    initial_state: TableState,
    features: FeatureFlags,
    registry: FeatureRegistry,

    models: RowModels<T>,
    /// Transient search text. Not part of `TableState`.
    quick_filter: Option<String>,

    get_row_id: Option<RowIdFn<T>>,
    aggregation_provider: Option<Rc<dyn AggregationProvider>>,
    render_fallback_value: CellValue,
    meta: serde_json::Map<String, serde_json::Value>,
    resolve_log: ResolveLog,
    on_state_change: Option<StateChangeFn>,
}

impl<T: Record> Table<T> {
    pub fn new(options: TableOptions<T>) -> Self {
        let tree = ColumnTree::build(&options.columns, options.column_defaults);
        let catalog = tree.catalog(&options.features);
        let registry = options.registry.unwrap_or_else(FeatureRegistry::with_builtins);

        let mut initial_state = options.initial_state;
        let declared = initial_state.clone();
        let ctx = FeatureContext {
            previous: &declared,
            flags: &options.features,
            columns: &catalog,
        };
        registry.normalize(&ctx, &mut initial_state);

        let mut table = Table {
            data: options.data.into_iter().map(Rc::new).collect(),
            tree,
            catalog,
            layout: ColumnLayout::default(),
            header_groups: Vec::new(),
            footer_groups: Vec::new(),
            state: initial_state.clone(),
            initial_state,
            features: options.features,
            registry,
            models: RowModels::default(),
            quick_filter: None,
            get_row_id: options.get_row_id,
            aggregation_provider: options.aggregation_provider,
            render_fallback_value: options.render_fallback_value,
            meta: options.meta,
            resolve_log: ResolveLog::new(options.on_resolve_error),
            on_state_change: options.on_state_change,
        };

        table.rebuild_layout();
        table.run_pipeline(RefreshModelParams::new(RefreshStage::Everything));
        table.reconcile();
        table.models.assign_display_indexes();
        log_info!(
            "STATE",
            "table created: {} records, {} columns ({} leaves), features {:?}",
            table.data.len(),
            table.tree.all_columns().len(),
            table.tree.leaf_count(),
            table.registry.names()
        );
        table
    }

    // ========================================================================
    // STATE GATEWAY
    // ========================================================================

    /// The single mutation primitive. Every other mutation goes through it.
    pub fn set_state(&mut self, state: TableState) {
        self.commit(state, RefreshStage::Nothing);
    }

    /// Derives the next state from the current one.
    pub fn update_state(&mut self, f: impl FnOnce(&TableState) -> TableState) {
        let next = f(&self.state);
        self.set_state(next);
    }

    /// Commits `candidate`, re-running the pipeline from the earlier of the
    /// classified stage and `floor`.
    fn commit(&mut self, mut candidate: TableState, floor: RefreshStage) {
        let ctx = FeatureContext {
            previous: &self.state,
            flags: &self.features,
            columns: &self.catalog,
        };
        self.registry.normalize(&ctx, &mut candidate);

        if candidate == self.state && floor == RefreshStage::Nothing {
            return;
        }
        let stage = RefreshStage::classify(&self.state, &candidate).min(floor);
        log_enter!("STATE", "commit", "stage {:?}", stage);

        let layout_changed = layout_inputs_changed(&self.state, &candidate, &self.features);
        let sizing_changed = self.state.column_sizing != candidate.column_sizing;
        let previous = std::mem::replace(&mut self.state, candidate);

        if layout_changed {
            self.rebuild_layout();
        } else if sizing_changed {
            self.rebuild_headers();
        }
        self.run_pipeline(RefreshModelParams::new(stage));
        self.reconcile();
        self.models.assign_display_indexes();

        let changed = self.state != previous;
        if changed {
            if let Some(callback) = self.on_state_change.as_mut() {
                callback(&self.state);
            }
        }
        log_exit!("STATE", "commit", "rows={} notified={}", self.models.paginated.len(), changed);
    }

    fn run_pipeline(&mut self, params: RefreshModelParams) {
        let ctx = StageContext {
            state: &self.state,
            flags: &self.features,
            tree: &self.tree,
            data: &self.data,
            get_row_id: self.get_row_id.as_ref(),
            quick_filter: self.quick_filter.as_deref(),
            aggregation_provider: self.aggregation_provider.as_deref(),
        };
        self.models.run(params, &ctx, &mut self.resolve_log);
    }

    /// Post-pipeline hooks. A changed state re-runs the stages it invalidates.
    fn reconcile(&mut self) {
        let mut next = self.state.clone();
        let ctx = ReconcileContext {
            flags: &self.features,
            columns: &self.catalog,
            pageable_rows: pageable_count(&self.models.expanded, &self.features),
        };
        self.registry.reconcile(&ctx, &mut next);
        if next == self.state {
            return;
        }
        let stage = RefreshStage::classify(&self.state, &next);
        log_debug!("STATE", "reconciled, re-running from {:?}", stage);
        self.state = next;
        self.run_pipeline(RefreshModelParams::new(stage));
    }

    fn rebuild_layout(&mut self) {
        self.layout = compute_layout(&self.tree, &self.state, &self.features);
        self.rebuild_headers();
        log_debug!(
            "COLUMNS",
            "layout: {} left, {} center, {} right",
            self.layout.left.len(),
            self.layout.center.len(),
            self.layout.right.len()
        );
    }

    fn rebuild_headers(&mut self) {
        self.header_groups = build_header_groups(&self.tree, &self.layout, &self.state, HeaderLabel::Header);
        self.footer_groups = build_footer_groups(&self.tree, &self.layout, &self.state);
    }

    // ========================================================================
    // DATA
    // ========================================================================

    /// Replaces the records and re-runs every stage.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data.into_iter().map(Rc::new).collect();
        let state = self.state.clone();
        self.commit(state, RefreshStage::Everything);
    }

    /// Recomputes group summaries, e.g. after the aggregation provider's
    /// backing data changed.
    pub fn refresh(&mut self) {
        let state = self.state.clone();
        self.commit(state, RefreshStage::Aggregate);
    }

    // ========================================================================
    // READ SURFACE
    // ========================================================================

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn initial_state(&self) -> &TableState {
        &self.initial_state
    }

    pub fn features(&self) -> &FeatureFlags {
        &self.features
    }

    pub fn meta(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.meta
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.meta.insert(key.into(), value);
    }

    pub fn data(&self) -> &[Rc<T>] {
        &self.data
    }

    /// Every column node, depth first in declaration order.
    pub fn all_columns(&self) -> &[Column<T>] {
        self.tree.all_columns()
    }

    /// Leaf columns in `column_order`, then declaration order.
    pub fn all_leaf_columns(&self) -> Vec<&Column<T>> {
        ordered_leaves(&self.tree, &self.state)
            .into_iter()
            .filter_map(|i| self.tree.at(i))
            .collect()
    }

    pub fn visible_leaf_columns(&self) -> Vec<&Column<T>> {
        self.columns_at(self.layout.all())
    }

    pub fn left_visible_leaf_columns(&self) -> Vec<&Column<T>> {
        self.columns_at(self.layout.left.iter().copied())
    }

    pub fn center_visible_leaf_columns(&self) -> Vec<&Column<T>> {
        self.columns_at(self.layout.center.iter().copied())
    }

    pub fn right_visible_leaf_columns(&self) -> Vec<&Column<T>> {
        self.columns_at(self.layout.right.iter().copied())
    }

    fn columns_at(&self, indices: impl Iterator<Item = usize>) -> Vec<&Column<T>> {
        indices.filter_map(|i| self.tree.at(i)).collect()
    }

    pub fn header_groups(&self) -> &[HeaderGroup] {
        &self.header_groups
    }

    pub fn footer_groups(&self) -> &[HeaderGroup] {
        &self.footer_groups
    }

    pub fn column(&self, id: &str) -> Option<&Column<T>> {
        self.tree.get(id)
    }

    /// Width of a leaf, or the summed visible width of a group.
    pub fn column_size(&self, id: &str) -> Option<f64> {
        self.tree.get(id).map(|c| self.tree.column_size(c, &self.state))
    }

    /// Summed width of the visible leaves.
    pub fn total_size(&self) -> f64 {
        self.visible_leaf_columns().iter().map(|c| c.size(&self.state)).sum()
    }

    /// Final rows: the current page of the visible rows.
    pub fn row_model(&self) -> &RowModel<T> {
        &self.models.paginated
    }

    pub fn pre_filtered_row_model(&self) -> &RowModel<T> {
        &self.models.core
    }

    pub fn pre_sorted_row_model(&self) -> &RowModel<T> {
        &self.models.filtered
    }

    pub fn pre_grouped_row_model(&self) -> &RowModel<T> {
        &self.models.sorted
    }

    pub fn pre_expanded_row_model(&self) -> &RowModel<T> {
        &self.models.aggregated
    }

    pub fn pre_pagination_row_model(&self) -> &RowModel<T> {
        &self.models.expanded
    }

    /// Any row of the grouped tree (group rows included), else any core row.
    pub fn row(&self, id: &str) -> Option<&RowRef<T>> {
        self.models.aggregated.row(id).or_else(|| self.models.core.row(id))
    }

    /// Depth-0 rows before pagination.
    pub fn top_level_row_count(&self) -> usize {
        self.models.expanded.top_level_len()
    }

    fn pagination_active(&self) -> Option<PaginationState> {
        self.state.pagination.filter(|_| self.features.enable_pagination)
    }

    /// Number of pages, 1 when pagination is off.
    pub fn page_count(&self) -> usize {
        match self.pagination_active() {
            Some(p) => page_count(pageable_count(&self.models.expanded, &self.features), p.page_size),
            None => 1,
        }
    }

    pub fn can_previous_page(&self) -> bool {
        self.pagination_active().is_some_and(|p| p.page_index > 0)
    }

    pub fn can_next_page(&self) -> bool {
        self.pagination_active()
            .is_some_and(|p| p.page_index + 1 < self.page_count())
    }

    /// Selected leaf rows, in core order.
    pub fn selected_rows(&self) -> Vec<RowRef<T>> {
        self.models
            .core
            .rows()
            .iter()
            .filter(|r| self.state.is_row_selected(r.id()))
            .cloned()
            .collect()
    }

    pub fn is_all_rows_selected(&self) -> bool {
        let rows = self.models.filtered.rows();
        !rows.is_empty() && rows.iter().all(|r| self.state.is_row_selected(r.id()))
    }

    /// Cells of `row` in visible column order.
    pub fn visible_cells<'r>(&self, row: &'r RowRef<T>) -> Vec<&'r Cell> {
        self.layout
            .all()
            .filter_map(|i| self.tree.at(i))
            .filter_map(|c| self.tree.leaf_position(c.id()))
            .filter_map(move |pos| row.cell_at(pos))
            .collect()
    }

    /// Cell value with the table's render fallback applied.
    pub fn render_value(&self, row: &RowRef<T>, column_id: &str) -> CellValue {
        row.cell(column_id)
            .map(|c| c.render_value(&self.render_fallback_value))
            .unwrap_or_else(|| self.render_fallback_value.clone())
    }

    /// Typed value of a cell. Leaf rows re-run the column's accessor function
    /// when it has one; otherwise the cached cell value is converted.
    pub fn row_value<V: FromCellValue>(&self, row: &RowRef<T>, column_id: &str) -> Option<V> {
        let function = self
            .tree
            .get(column_id)
            .and_then(|c| c.accessor())
            .and_then(|a| a.function());
        if let (Some(f), Some(record)) = (function, row.original()) {
            if let Ok(value) = call_accessor(f, record, column_id) {
                return V::from_cell_value(&value);
            }
        }
        V::from_cell_value(&row.cell(column_id)?.value())
    }

    /// Resolution failures of the last core build.
    pub fn resolve_failures(&self) -> &[ResolveFailure] {
        self.resolve_log.failures()
    }

    pub fn quick_filter(&self) -> Option<&str> {
        self.quick_filter.as_deref()
    }

    // ========================================================================
    // SORTING
    // ========================================================================

    pub fn set_sorting(&mut self, sorting: SortingState) {
        let next = self.state.with_sorting(sorting);
        self.set_state(next);
    }

    /// Single-sort toggle: asc, desc, unsorted.
    pub fn toggle_sort(&mut self, column_id: &str) {
        self.toggle_sorting(column_id, false);
    }

    /// Toggle honoring multi-sort when `multi` is set and enabled.
    pub fn toggle_sorting(&mut self, column_id: &str, multi: bool) {
        let Some(column) = self.tree.get(column_id) else {
            return;
        };
        let sorting = toggled_sorting(&self.state.sorting, column, &self.features, multi);
        self.set_sorting(sorting);
    }

    pub fn reset_sorting(&mut self) {
        self.set_sorting(self.initial_state.sorting.clone());
    }

    // ========================================================================
    // FILTERING
    // ========================================================================

    /// Sets or (with None) clears one column's filter.
    pub fn set_column_filter(&mut self, column_id: &str, value: Option<FilterValue>) {
        let mut filters = self.state.column_filters.clone();
        match (filters.iter().position(|f| f.id == column_id), value) {
            (Some(i), Some(value)) => filters[i].value = value,
            (Some(i), None) => {
                filters.remove(i);
            }
            (None, Some(value)) => filters.push(ColumnFilter::new(column_id, value)),
            (None, None) => return,
        }
        let next = self.state.with_column_filters(filters);
        self.set_state(next);
    }

    pub fn set_column_filters(&mut self, filters: Vec<ColumnFilter>) {
        let next = self.state.with_column_filters(filters);
        self.set_state(next);
    }

    pub fn reset_column_filters(&mut self) {
        self.set_column_filters(self.initial_state.column_filters.clone());
    }

    pub fn set_global_filter(&mut self, value: Option<FilterValue>) {
        let next = self.state.with_global_filter(value);
        self.set_state(next);
    }

    pub fn reset_global_filter(&mut self) {
        self.set_global_filter(self.initial_state.global_filter.clone());
    }

    /// Transient search across globally filterable cells.
    pub fn set_quick_filter(&mut self, text: Option<String>) {
        let text = text.filter(|t| !t.trim().is_empty());
        if text == self.quick_filter {
            return;
        }
        self.quick_filter = text;
        let mut next = self.state.clone();
        if self.features.auto_reset_page_index {
            if let Some(pagination) = next.pagination.as_mut() {
                pagination.page_index = 0;
            }
        }
        self.commit(next, RefreshStage::Filter);
    }

    pub fn reset_quick_filter(&mut self) {
        self.set_quick_filter(None);
    }

    // ========================================================================
    // GROUPING / EXPANSION
    // ========================================================================

    pub fn set_grouping(&mut self, grouping: GroupingState) {
        let next = self.state.with_grouping(grouping);
        self.set_state(next);
    }

    /// Appends the column to the grouping, or removes it if already grouped.
    pub fn toggle_grouping(&mut self, column_id: &str) {
        let mut grouping = self.state.grouping.clone();
        match grouping.iter().position(|id| id == column_id) {
            Some(i) => {
                grouping.remove(i);
            }
            None => grouping.push(column_id.to_string()),
        }
        self.set_grouping(grouping);
    }

    pub fn reset_grouping(&mut self) {
        self.set_grouping(self.initial_state.grouping.clone());
    }

    pub fn set_expanded(&mut self, expanded: ExpandedState) {
        let next = self.state.with_expanded(expanded);
        self.set_state(next);
    }

    /// Flips one row. Under `All`, every other expandable row stays expanded.
    pub fn toggle_row_expanded(&mut self, row_id: &str) {
        let expanded_now = self.state.expanded.is_expanded(row_id);
        let mut rows: FxHashMap<String, bool> = match &self.state.expanded {
            ExpandedState::All => self
                .models
                .aggregated
                .flat_rows()
                .iter()
                .filter(|r| r.can_expand())
                .map(|r| (r.id().to_string(), true))
                .collect(),
            ExpandedState::Rows(rows) => rows.clone(),
        };
        rows.insert(row_id.to_string(), !expanded_now);
        self.set_expanded(ExpandedState::Rows(rows));
    }

    pub fn is_all_rows_expanded(&self) -> bool {
        match &self.state.expanded {
            ExpandedState::All => true,
            ExpandedState::Rows(_) => {
                let mut expandable = self.models.aggregated.flat_rows().iter().filter(|r| r.can_expand()).peekable();
                expandable.peek().is_some() && expandable.all(|r| r.is_expanded(&self.state))
            }
        }
    }

    /// Expands everything, or collapses everything when all rows are expanded.
    pub fn toggle_all_rows_expanded(&mut self) {
        let next = if self.is_all_rows_expanded() {
            ExpandedState::default()
        } else {
            ExpandedState::All
        };
        self.set_expanded(next);
    }

    pub fn reset_expanded(&mut self) {
        self.set_expanded(self.initial_state.expanded.clone());
    }

    // ========================================================================
    // PAGINATION
    // ========================================================================

    /// None turns pagination off.
    pub fn set_pagination(&mut self, pagination: Option<PaginationState>) {
        let next = self.state.with_pagination(pagination);
        self.set_state(next);
    }

    /// Out-of-range indexes are clamped to the last page.
    pub fn set_page_index(&mut self, page_index: usize) {
        let mut pagination = self.state.pagination.unwrap_or_default();
        pagination.page_index = page_index;
        self.set_pagination(Some(pagination));
    }

    /// Changes the page size, keeping the current first row on screen.
    pub fn set_page_size(&mut self, page_size: usize) {
        let current = self.state.pagination.unwrap_or_default();
        let page_size = page_size.max(1);
        let top_row = current.page_index * current.page_size.max(1);
        self.set_pagination(Some(PaginationState::new(top_row / page_size, page_size)));
    }

    pub fn next_page(&mut self) {
        if let Some(p) = self.state.pagination.filter(|_| self.can_next_page()) {
            self.set_page_index(p.page_index + 1);
        }
    }

    pub fn previous_page(&mut self) {
        if let Some(p) = self.state.pagination.filter(|_| self.can_previous_page()) {
            self.set_page_index(p.page_index - 1);
        }
    }

    pub fn reset_pagination(&mut self) {
        self.set_pagination(self.initial_state.pagination);
    }

    // ========================================================================
    // COLUMN LAYOUT
    // ========================================================================

    pub fn set_column_visibility(&mut self, visibility: ColumnVisibilityState) {
        let next = self.state.with_column_visibility(visibility);
        self.set_state(next);
    }

    /// Flips a leaf, or every leaf of a group column.
    pub fn toggle_column_visibility(&mut self, column_id: &str) {
        let Some(column) = self.tree.get(column_id) else {
            return;
        };
        let visible = column.is_visible(&self.state);
        let mut visibility = self.state.column_visibility.clone();
        for leaf in column.leaf_ids() {
            visibility.insert(leaf.clone(), !visible);
        }
        self.set_column_visibility(visibility);
    }

    /// Shows every column, or hides every hideable one when all are visible.
    pub fn toggle_all_columns_visible(&mut self) {
        let all_visible = self.tree.leaf_columns().all(|c| c.is_visible(&self.state));
        let visibility = if all_visible {
            self.tree
                .leaf_columns()
                .filter(|c| c.can_hide(&self.features))
                .map(|c| (c.id().to_string(), false))
                .collect()
        } else {
            ColumnVisibilityState::default()
        };
        self.set_column_visibility(visibility);
    }

    pub fn reset_column_visibility(&mut self) {
        self.set_column_visibility(self.initial_state.column_visibility.clone());
    }

    pub fn set_column_sizing(&mut self, sizing: ColumnSizingState) {
        let next = self.state.with_column_sizing(sizing);
        self.set_state(next);
    }

    pub fn resize_column(&mut self, column_id: &str, width: f64) {
        let mut sizing = self.state.column_sizing.clone();
        sizing.insert(column_id.to_string(), width);
        self.set_column_sizing(sizing);
    }

    pub fn reset_column_sizing(&mut self) {
        self.set_column_sizing(self.initial_state.column_sizing.clone());
    }

    pub fn set_column_order(&mut self, order: ColumnOrderState) {
        let next = self.state.with_column_order(order);
        self.set_state(next);
    }

    /// Moves a column (a group moves its leaves as a block) to `to_index`
    /// among the leaf columns.
    pub fn move_column(&mut self, column_id: &str, to_index: usize) {
        let moving = self.catalog.leaves_of(column_id).to_vec();
        if moving.is_empty() {
            return;
        }
        let mut order: Vec<String> = self
            .all_leaf_columns()
            .iter()
            .map(|c| c.id().to_string())
            .filter(|id| !moving.contains(id))
            .collect();
        let at = to_index.min(order.len());
        order.splice(at..at, moving);
        self.set_column_order(order);
    }

    pub fn reset_column_order(&mut self) {
        self.set_column_order(self.initial_state.column_order.clone());
    }

    pub fn set_column_pinning(&mut self, pinning: ColumnPinningState) {
        let next = self.state.with_column_pinning(pinning);
        self.set_state(next);
    }

    /// Pins a column to a side, or un-pins it with None.
    pub fn pin_column(&mut self, column_id: &str, position: Option<PinPosition>) {
        let pinning = pinned(&self.state, &[column_id.to_string()], position);
        self.set_column_pinning(pinning);
    }

    pub fn reset_column_pinning(&mut self) {
        self.set_column_pinning(self.initial_state.column_pinning.clone());
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    pub fn set_row_selection(&mut self, selection: RowSelectionState) {
        let next = self.state.with_row_selection(selection);
        self.set_state(next);
    }

    /// Flips one row. A group row flips all its leaves when sub-row selection
    /// is enabled. Single-selection mode replaces the previous selection, and
    /// a group row there stands for its first leaf in core order.
    pub fn toggle_row_selected(&mut self, row_id: &str) {
        let single = !self.features.enable_multi_row_selection;
        let (ids, select) = match self.row(row_id) {
            Some(row) if row.is_group_row() && self.features.enable_sub_row_selection && single => {
                let Some(first) = row.leaf_rows().into_iter().min_by_key(|r| r.index()) else {
                    return;
                };
                let select = !self.state.is_row_selected(first.id());
                (vec![first.id().to_string()], select)
            }
            Some(row) if row.is_group_row() && self.features.enable_sub_row_selection => {
                let ids: Vec<String> = row.leaf_rows().iter().map(|r| r.id().to_string()).collect();
                (ids, !row.is_selected(&self.state))
            }
            Some(row) => (vec![row.id().to_string()], !self.state.is_row_selected(row.id())),
            None => return,
        };

        let mut selection = if single {
            RowSelectionState::default()
        } else {
            self.state.row_selection.clone()
        };
        for id in ids {
            if select {
                selection.insert(id, true);
            } else {
                selection.remove(&id);
            }
        }
        self.set_row_selection(selection);
    }

    /// Selects every filtered row, or clears the selection when all are selected.
    pub fn toggle_all_rows_selected(&mut self) {
        let selection = if self.is_all_rows_selected() {
            RowSelectionState::default()
        } else {
            self.models
                .filtered
                .rows()
                .iter()
                .map(|r| (r.id().to_string(), true))
                .collect()
        };
        self.set_row_selection(selection);
    }

    pub fn reset_row_selection(&mut self) {
        self.set_row_selection(self.initial_state.row_selection.clone());
    }

    // ========================================================================
    // RESET
    // ========================================================================

    /// Back to the initial state. The quick filter is cleared as well.
    pub fn reset_state(&mut self) {
        self.quick_filter = None;
        let initial = self.initial_state.clone();
        self.commit(initial, RefreshStage::Filter);
    }
}

impl<T> std::fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("records", &self.data.len())
            .field("columns", &self.tree)
            .field("state", &self.state)
            .field("features", &self.features)
            .field("registry", &self.registry)
            .field("row_model", &*self.models.paginated)
            .field("quick_filter", &self.quick_filter)
            .finish_non_exhaustive()
    }
}
