//! FILENAME: table-engine/src/column.rs
//! Column Model - Declarations and the live column tree built from them.
//!
//! `ColumnDef` is what the host declares. `ColumnTree::build` walks the
//! declarations depth first, assigns ids and produces `Column` nodes in
//! pre-order. Derived properties (visibility, size, sort direction, ...) are
//! computed on demand from `TableState` and are never cached on the node.

use std::fmt;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use values::CellValue;

use crate::aggregation::AggregationFn;
use crate::error::AccessorError;
use crate::features::sorting::SortingFn;
use crate::logging::log_warn;
use crate::options::{ColumnDefaults, FeatureFlags};
use crate::state::{FilterValue, PinPosition, SortDirection, TableState};

// ============================================================================
// ACCESSOR
// ============================================================================

pub type AccessorFn<T> = Rc<dyn Fn(&T) -> Result<CellValue, AccessorError>>;

/// How a leaf column reads its value from a record.
pub enum Accessor<T> {
    /// Typed function over the record.
    Function(AccessorFn<T>),
    /// Key looked up through `Record::property`, then `Record::field`.
    Key(String),
    /// Function first, key when the function fails.
    FunctionOrKey(AccessorFn<T>, String),
}

impl<T> Accessor<T> {
    pub fn function(&self) -> Option<&AccessorFn<T>> {
        match self {
            Accessor::Function(f) | Accessor::FunctionOrKey(f, _) => Some(f),
            Accessor::Key(_) => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Accessor::Key(k) | Accessor::FunctionOrKey(_, k) => Some(k),
            Accessor::Function(_) => None,
        }
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Function(f) => Accessor::Function(Rc::clone(f)),
            Accessor::Key(k) => Accessor::Key(k.clone()),
            Accessor::FunctionOrKey(f, k) => Accessor::FunctionOrKey(Rc::clone(f), k.clone()),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Function(_) => f.write_str("Function(..)"),
            Accessor::Key(k) => f.debug_tuple("Key").field(k).finish(),
            Accessor::FunctionOrKey(_, k) => f.debug_tuple("FunctionOrKey").field(k).finish(),
        }
    }
}

// ============================================================================
// COLUMN DEFINITION
// ============================================================================

/// A column declaration. A definition with nested `columns` is a group.
pub struct ColumnDef<T> {
    /// Explicit id. Falls back to the accessor key, then to a positional id.
    pub id: Option<String>,

    pub accessor: Option<Accessor<T>>,

    /// Header label. Defaults to the column id.
    pub header: Option<String>,

    /// Footer label. Defaults to empty.
    pub footer: Option<String>,

    /// Child declarations. Non-empty makes this a group column.
    pub columns: Vec<ColumnDef<T>>,

    // Per-column feature overrides. None inherits the table flag.
    pub enable_sorting: Option<bool>,
    pub enable_column_filter: Option<bool>,
    pub enable_global_filter: Option<bool>,
    pub enable_grouping: Option<bool>,
    pub enable_resizing: Option<bool>,
    pub enable_hiding: Option<bool>,
    pub enable_pinning: Option<bool>,

    /// Fixed width.
    pub width: Option<f64>,
    /// Flexible size.
    pub size: Option<f64>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,

    pub sorting_fn: SortingFn,

    /// Start the sort cycle at descending.
    pub sort_desc_first: bool,

    /// Reverse the comparator (e.g. rankings where 1 is best).
    pub invert_sorting: bool,

    pub aggregation_fn: Option<AggregationFn>,
}

impl<T> ColumnDef<T> {
    fn blank() -> Self {
        ColumnDef {
            id: None,
            accessor: None,
            header: None,
            footer: None,
            columns: Vec::new(),
            enable_sorting: None,
            enable_column_filter: None,
            enable_global_filter: None,
            enable_grouping: None,
            enable_resizing: None,
            enable_hiding: None,
            enable_pinning: None,
            width: None,
            size: None,
            min_size: None,
            max_size: None,
            sorting_fn: SortingFn::default(),
            sort_desc_first: false,
            invert_sorting: false,
            aggregation_fn: None,
        }
    }

    /// Leaf column reading `key` from the record. The key doubles as the id.
    pub fn accessor(key: impl Into<String>) -> Self {
        ColumnDef {
            accessor: Some(Accessor::Key(key.into())),
            ..ColumnDef::blank()
        }
    }

    /// Leaf column computed by an infallible function.
    pub fn accessor_fn<F, V>(id: impl Into<String>, f: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> V + 'static,
        V: Into<CellValue> + 'static,
    {
        ColumnDef::try_accessor_fn(id, move |record: &T| Ok(f(record).into()))
    }

    /// Leaf column computed by a fallible function. An error leaves the cell empty.
    pub fn try_accessor_fn<F>(id: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> Result<CellValue, AccessorError> + 'static,
    {
        ColumnDef {
            id: Some(id.into()),
            accessor: Some(Accessor::Function(Rc::new(f))),
            ..ColumnDef::blank()
        }
    }

    /// Group column over nested declarations.
    pub fn group(header: impl Into<String>, columns: Vec<ColumnDef<T>>) -> Self {
        ColumnDef {
            header: Some(header.into()),
            columns,
            ..ColumnDef::blank()
        }
    }

    /// Leaf column with no accessor (row actions, checkboxes, ...).
    pub fn display(id: impl Into<String>) -> Self {
        ColumnDef {
            id: Some(id.into()),
            ..ColumnDef::blank()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Key to fall back on when the accessor function fails.
    pub fn fallback_key(mut self, key: impl Into<String>) -> Self {
        self.accessor = match self.accessor.take() {
            Some(Accessor::Function(f)) | Some(Accessor::FunctionOrKey(f, _)) => {
                Some(Accessor::FunctionOrKey(f, key.into()))
            }
            _ => Some(Accessor::Key(key.into())),
        };
        self
    }

    pub fn header(mut self, label: impl Into<String>) -> Self {
        self.header = Some(label.into());
        self
    }

    pub fn footer(mut self, label: impl Into<String>) -> Self {
        self.footer = Some(label.into());
        self
    }

    pub fn sortable(mut self, enabled: bool) -> Self {
        self.enable_sorting = Some(enabled);
        self
    }

    pub fn filterable(mut self, enabled: bool) -> Self {
        self.enable_column_filter = Some(enabled);
        self
    }

    pub fn globally_filterable(mut self, enabled: bool) -> Self {
        self.enable_global_filter = Some(enabled);
        self
    }

    pub fn groupable(mut self, enabled: bool) -> Self {
        self.enable_grouping = Some(enabled);
        self
    }

    pub fn resizable(mut self, enabled: bool) -> Self {
        self.enable_resizing = Some(enabled);
        self
    }

    pub fn hideable(mut self, enabled: bool) -> Self {
        self.enable_hiding = Some(enabled);
        self
    }

    pub fn pinnable(mut self, enabled: bool) -> Self {
        self.enable_pinning = Some(enabled);
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn min_size(mut self, min: f64) -> Self {
        self.min_size = Some(min);
        self
    }

    pub fn max_size(mut self, max: f64) -> Self {
        self.max_size = Some(max);
        self
    }

    pub fn sorting_fn(mut self, sorting_fn: SortingFn) -> Self {
        self.sorting_fn = sorting_fn;
        self
    }

    pub fn sort_desc_first(mut self, desc_first: bool) -> Self {
        self.sort_desc_first = desc_first;
        self
    }

    pub fn invert_sorting(mut self, invert: bool) -> Self {
        self.invert_sorting = invert;
        self
    }

    pub fn aggregation(mut self, aggregation_fn: AggregationFn) -> Self {
        self.aggregation_fn = Some(aggregation_fn);
        self
    }

    /// Clone without the nested declarations.
    fn shallow_clone(&self) -> Self {
        ColumnDef {
            id: self.id.clone(),
            accessor: self.accessor.clone(),
            header: self.header.clone(),
            footer: self.footer.clone(),
            columns: Vec::new(),
            enable_sorting: self.enable_sorting,
            enable_column_filter: self.enable_column_filter,
            enable_global_filter: self.enable_global_filter,
            enable_grouping: self.enable_grouping,
            enable_resizing: self.enable_resizing,
            enable_hiding: self.enable_hiding,
            enable_pinning: self.enable_pinning,
            width: self.width,
            size: self.size,
            min_size: self.min_size,
            max_size: self.max_size,
            sorting_fn: self.sorting_fn.clone(),
            sort_desc_first: self.sort_desc_first,
            invert_sorting: self.invert_sorting,
            aggregation_fn: self.aggregation_fn.clone(),
        }
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        ColumnDef {
            columns: self.columns.clone(),
            ..self.shallow_clone()
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("accessor", &self.accessor)
            .field("header", &self.header)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// LIVE COLUMN
// ============================================================================

pub struct Column<T> {
    id: String,
    def: ColumnDef<T>,
    /// Pre-order position in `ColumnTree::all_columns`.
    index: usize,
    depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Leaf ids under this column, in declaration order. Just `[id]` for a leaf.
    leaf_ids: Vec<String>,
    defaults: ColumnDefaults,
}

impl<T> Column<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn def(&self) -> &ColumnDef<T> {
        &self.def
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent_index(&self) -> Option<usize> {
        self.parent
    }

    pub fn child_indices(&self) -> &[usize] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn leaf_ids(&self) -> &[String] {
        &self.leaf_ids
    }

    pub fn accessor(&self) -> Option<&Accessor<T>> {
        self.def.accessor.as_ref()
    }

    pub fn header_label(&self) -> &str {
        self.def.header.as_deref().unwrap_or(&self.id)
    }

    pub fn footer_label(&self) -> &str {
        self.def.footer.as_deref().unwrap_or("")
    }

    fn is_data_leaf(&self) -> bool {
        self.is_leaf() && self.def.accessor.is_some()
    }

    pub fn can_sort(&self, flags: &FeatureFlags) -> bool {
        self.is_data_leaf() && flags.enable_sorting && self.def.enable_sorting.unwrap_or(true)
    }

    pub fn can_filter(&self, flags: &FeatureFlags) -> bool {
        self.is_data_leaf()
            && flags.enable_column_filters
            && self.def.enable_column_filter.unwrap_or(true)
    }

    pub fn can_global_filter(&self, flags: &FeatureFlags) -> bool {
        self.is_data_leaf()
            && flags.enable_global_filter
            && self.def.enable_global_filter.unwrap_or(true)
    }

    pub fn can_group(&self, flags: &FeatureFlags) -> bool {
        self.is_data_leaf() && flags.enable_grouping && self.def.enable_grouping.unwrap_or(true)
    }

    pub fn can_hide(&self, flags: &FeatureFlags) -> bool {
        flags.enable_hiding && self.def.enable_hiding.unwrap_or(true)
    }

    pub fn can_resize(&self, flags: &FeatureFlags) -> bool {
        flags.enable_column_resizing && self.def.enable_resizing.unwrap_or(true)
    }

    pub fn can_pin(&self, flags: &FeatureFlags) -> bool {
        flags.enable_column_pinning && self.def.enable_pinning.unwrap_or(true)
    }

    /// Leaves default to visible. A group is visible while any leaf is.
    pub fn is_visible(&self, state: &TableState) -> bool {
        self.leaf_ids
            .iter()
            .any(|id| state.column_visibility.get(id).copied().unwrap_or(true))
    }

    /// Width of this column as a leaf:
    /// sizing override, fixed width, min size, flexible size, then the default,
    /// clamped to `[min, max]`.
    pub fn size(&self, state: &TableState) -> f64 {
        let def = &self.def;
        let size = state
            .column_sizing
            .get(&self.id)
            .copied()
            .or(def.width)
            .or(def.min_size)
            .or(def.size)
            .unwrap_or(self.defaults.size);
        let min = def.min_size.unwrap_or(self.defaults.min_size);
        let max = def.max_size.or(self.defaults.max_size).unwrap_or(f64::INFINITY);
        size.max(min).min(max.max(min))
    }

    pub fn sort_direction(&self, state: &TableState) -> Option<SortDirection> {
        state.column_sort(&self.id).map(|(_, s)| s.direction())
    }

    /// Position in the sorting list.
    pub fn sort_index(&self, state: &TableState) -> Option<usize> {
        state.column_sort(&self.id).map(|(i, _)| i)
    }

    pub fn first_sort_direction(&self) -> SortDirection {
        if self.def.sort_desc_first {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn is_grouped(&self, state: &TableState) -> bool {
        self.grouped_index(state).is_some()
    }

    pub fn grouped_index(&self, state: &TableState) -> Option<usize> {
        state.grouping.iter().position(|id| *id == self.id)
    }

    pub fn filter_value<'s>(&self, state: &'s TableState) -> Option<&'s FilterValue> {
        state.column_filter(&self.id)
    }

    pub fn is_filtered(&self, state: &TableState) -> bool {
        self.filter_value(state).is_some()
    }

    pub fn pinned(&self, state: &TableState) -> Option<PinPosition> {
        state.column_pinning.position(&self.id)
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("leaf_ids", &self.leaf_ids)
            .finish()
    }
}

// ============================================================================
// COLUMN TREE
// ============================================================================

/// All columns in pre-order, with id and leaf-position indexes.
pub struct ColumnTree<T> {
    columns: Vec<Column<T>>,
    /// Indices into `columns` of the leaves, in declaration order.
    leaves: Vec<usize>,
    by_id: FxHashMap<String, usize>,
    /// Leaf id -> position in `leaves` (and in every row's cells).
    leaf_positions: FxHashMap<String, usize>,
    /// Column id -> pre-order position; tie-break when no explicit order exists.
    initial_order: FxHashMap<String, usize>,
    max_depth: usize,
}

impl<T> ColumnTree<T> {
    pub fn build(defs: &[ColumnDef<T>], defaults: ColumnDefaults) -> Self {
        let mut tree = ColumnTree {
            columns: Vec::new(),
            leaves: Vec::new(),
            by_id: FxHashMap::default(),
            leaf_positions: FxHashMap::default(),
            initial_order: FxHashMap::default(),
            max_depth: 0,
        };
        for (i, def) in defs.iter().enumerate() {
            tree.add(def, None, i, 0, defaults);
        }
        tree.collect_leaf_ids();
        tree
    }

    fn add(
        &mut self,
        def: &ColumnDef<T>,
        parent: Option<usize>,
        sibling_index: usize,
        depth: usize,
        defaults: ColumnDefaults,
    ) -> usize {
        let id = resolve_column_id(def, parent.map(|p| self.columns[p].id.as_str()), sibling_index);
        let index = self.columns.len();

        if self.by_id.contains_key(&id) {
            log_warn!("COLUMNS", "duplicate column id '{}'; first declaration wins", id);
        } else {
            self.by_id.insert(id.clone(), index);
            self.initial_order.insert(id.clone(), index);
        }

        self.columns.push(Column {
            id,
            def: def.shallow_clone(),
            index,
            depth,
            parent,
            children: Vec::new(),
            leaf_ids: Vec::new(),
            defaults,
        });
        self.max_depth = self.max_depth.max(depth);

        if def.columns.is_empty() {
            let column_id = self.columns[index].id.clone();
            self.leaf_positions
                .entry(column_id)
                .or_insert(self.leaves.len());
            self.leaves.push(index);
        } else {
            for (i, child) in def.columns.iter().enumerate() {
                let child_index = self.add(child, Some(index), i, depth + 1, defaults);
                self.columns[index].children.push(child_index);
            }
        }
        index
    }

    fn collect_leaf_ids(&mut self) {
        // Pre-order: children come after parents, so walk backwards.
        for index in (0..self.columns.len()).rev() {
            let leaf_ids = if self.columns[index].is_leaf() {
                vec![self.columns[index].id.clone()]
            } else {
                self.columns[index]
                    .children
                    .iter()
                    .flat_map(|c| self.columns[*c].leaf_ids.iter().cloned())
                    .collect()
            };
            self.columns[index].leaf_ids = leaf_ids;
        }
    }

    pub fn all_columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn leaf_columns(&self) -> impl Iterator<Item = &Column<T>> + '_ {
        self.leaves.iter().map(move |i| &self.columns[*i])
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Column at leaf position `position`.
    pub fn leaf_at(&self, position: usize) -> Option<&Column<T>> {
        self.leaves.get(position).map(|i| &self.columns[*i])
    }

    pub fn get(&self, id: &str) -> Option<&Column<T>> {
        self.by_id.get(id).map(|i| &self.columns[*i])
    }

    pub fn at(&self, index: usize) -> Option<&Column<T>> {
        self.columns.get(index)
    }

    /// Position of a leaf among the leaves, which is also its cell position.
    pub fn leaf_position(&self, id: &str) -> Option<usize> {
        self.leaf_positions.get(id).copied()
    }

    pub fn initial_position(&self, id: &str) -> Option<usize> {
        self.initial_order.get(id).copied()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Ancestor of `column` at `depth`, or the column itself.
    pub(crate) fn ancestor_at<'a>(&'a self, column: &'a Column<T>, depth: usize) -> Option<&'a Column<T>> {
        let mut current = column;
        while current.depth > depth {
            current = &self.columns[current.parent?];
        }
        (current.depth == depth).then_some(current)
    }

    /// Width of any column: leaves report their own size, groups the sum of
    /// their visible leaves.
    pub fn column_size(&self, column: &Column<T>, state: &TableState) -> f64 {
        if column.is_leaf() {
            return column.size(state);
        }
        column
            .leaf_ids
            .iter()
            .filter_map(|id| self.get(id))
            .filter(|leaf| leaf.is_visible(state))
            .map(|leaf| leaf.size(state))
            .sum()
    }

    pub fn catalog(&self, flags: &FeatureFlags) -> ColumnCatalog {
        let mut entries = FxHashMap::default();
        for column in &self.columns {
            entries.entry(column.id.clone()).or_insert_with(|| ColumnCaps {
                is_leaf: column.is_leaf(),
                can_sort: column.can_sort(flags),
                can_filter: column.can_filter(flags),
                can_global_filter: column.can_global_filter(flags),
                can_group: column.can_group(flags),
                can_hide: column.can_hide(flags),
                can_resize: column.can_resize(flags),
                can_pin: column.can_pin(flags),
                leaf_ids: column.leaf_ids.clone(),
            });
        }
        ColumnCatalog {
            entries,
            leaf_ids: self.leaf_columns().map(|c| c.id.clone()).collect(),
        }
    }
}

fn resolve_column_id<T>(def: &ColumnDef<T>, parent_id: Option<&str>, sibling_index: usize) -> String {
    if let Some(id) = def.id.as_deref().filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    if let Some(key) = def.accessor.as_ref().and_then(Accessor::key).filter(|k| !k.is_empty()) {
        return key.to_string();
    }
    match parent_id {
        Some(parent) => format!("{}_{}", parent, sibling_index),
        None => format!("column_{}", sibling_index),
    }
}

impl<T> fmt::Debug for ColumnTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnTree")
            .field("columns", &self.columns)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

// ============================================================================
// COLUMN CATALOG
// ============================================================================

/// Capabilities of one column under the table's feature flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCaps {
    pub is_leaf: bool,
    pub can_sort: bool,
    pub can_filter: bool,
    pub can_global_filter: bool,
    pub can_group: bool,
    pub can_hide: bool,
    pub can_resize: bool,
    pub can_pin: bool,
    pub leaf_ids: Vec<String>,
}

/// Record-type independent view of the column tree used by feature hooks.
#[derive(Debug, Clone, Default)]
pub struct ColumnCatalog {
    entries: FxHashMap<String, ColumnCaps>,
    leaf_ids: Vec<String>,
}

impl ColumnCatalog {
    pub fn get(&self, id: &str) -> Option<&ColumnCaps> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn leaf_ids(&self) -> &[String] {
        &self.leaf_ids
    }

    /// True when `id` is a known column and `check` holds for it.
    pub fn allows(&self, id: &str, check: impl Fn(&ColumnCaps) -> bool) -> bool {
        self.entries.get(id).is_some_and(check)
    }

    /// Leaf ids covered by `id` (itself for a leaf). Empty when unknown.
    pub fn leaves_of(&self, id: &str) -> &[String] {
        self.entries.get(id).map_or(&[][..], |c| c.leaf_ids.as_slice())
    }
}

/// Keeps the first occurrence of each id.
pub(crate) fn dedupe_ids(ids: &mut Vec<String>) {
    let mut seen = FxHashSet::default();
    ids.retain(|id| seen.insert(id.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use values::Record;

    struct Item;

    impl Record for Item {
        fn field(&self, _key: &str) -> Option<CellValue> {
            None
        }
    }

    fn defs() -> Vec<ColumnDef<Item>> {
        vec![
            ColumnDef::accessor("name"),
            ColumnDef::group(
                "Contact",
                vec![
                    ColumnDef::accessor("email"),
                    ColumnDef::accessor_fn("phone", |_: &Item| "n/a"),
                    ColumnDef::display(""),
                ],
            ),
            ColumnDef::display(""),
        ]
    }

    #[test]
    fn test_id_fallback_chain() {
        let tree = ColumnTree::build(&defs(), ColumnDefaults::default());
        let ids: Vec<&str> = tree.all_columns().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["name", "column_1", "email", "phone", "column_1_2", "column_2"]);
    }

    #[test]
    fn test_leaves_in_declaration_order() {
        let tree = ColumnTree::build(&defs(), ColumnDefaults::default());
        let leaves: Vec<&str> = tree.leaf_columns().map(|c| c.id()).collect();
        assert_eq!(leaves, vec!["name", "email", "phone", "column_1_2", "column_2"]);
        assert_eq!(tree.leaf_position("phone"), Some(2));
        assert_eq!(tree.max_depth(), 1);

        let group = tree.get("column_1").unwrap();
        assert!(!group.is_leaf());
        assert_eq!(group.leaf_ids(), ["email", "phone", "column_1_2"]);
        assert_eq!(group.header_label(), "Contact");
    }

    #[test]
    fn test_ancestor_at_depth() {
        let tree = ColumnTree::build(&defs(), ColumnDefaults::default());
        let email = tree.get("email").unwrap();
        let name = tree.get("name").unwrap();

        assert_eq!(tree.ancestor_at(email, 0).map(|c| c.id()), Some("column_1"));
        assert_eq!(tree.ancestor_at(email, 1).map(|c| c.id()), Some("email"));
        assert_eq!(tree.ancestor_at(name, 0).map(|c| c.id()), Some("name"));
        assert!(tree.ancestor_at(name, 1).is_none());
    }

    #[test]
    fn test_duplicate_id_first_wins() {
        let defs: Vec<ColumnDef<Item>> = vec![
            ColumnDef::accessor("a").header("First"),
            ColumnDef::accessor("a").header("Second"),
        ];
        let tree = ColumnTree::build(&defs, ColumnDefaults::default());
        assert_eq!(tree.all_columns().len(), 2);
        assert_eq!(tree.get("a").unwrap().header_label(), "First");
        assert_eq!(tree.leaf_position("a"), Some(0));
    }

    #[test]
    fn test_size_resolution_order() {
        let defs: Vec<ColumnDef<Item>> = vec![
            ColumnDef::accessor("plain"),
            ColumnDef::accessor("fixed").width(80.0).size(200.0),
            ColumnDef::accessor("flex").size(200.0),
            ColumnDef::accessor("tiny").size(10.0),
            ColumnDef::accessor("capped").size(500.0).max_size(300.0),
            ColumnDef::accessor("minned").min_size(60.0).size(200.0),
        ];
        let tree = ColumnTree::build(&defs, ColumnDefaults::default());
        let mut state = TableState::default();
        let size = |state: &TableState, id: &str| tree.get(id).unwrap().size(state);

        assert_eq!(size(&state, "plain"), 150.0);
        assert_eq!(size(&state, "fixed"), 80.0);
        assert_eq!(size(&state, "flex"), 200.0);
        assert_eq!(size(&state, "tiny"), 40.0);
        assert_eq!(size(&state, "capped"), 300.0);
        assert_eq!(size(&state, "minned"), 60.0);

        state.column_sizing.insert("fixed".to_string(), 120.0);
        assert_eq!(size(&state, "fixed"), 120.0);
    }

    #[test]
    fn test_group_size_sums_visible_leaves() {
        let tree = ColumnTree::build(&defs(), ColumnDefaults::default());
        let mut state = TableState::default();
        let group = tree.get("column_1").unwrap();
        assert_eq!(tree.column_size(group, &state), 450.0);

        state.column_visibility.insert("email".to_string(), false);
        assert_eq!(tree.column_size(group, &state), 300.0);
        assert!(group.is_visible(&state));
    }

    #[test]
    fn test_capabilities() {
        let flags = FeatureFlags::default();
        let tree = ColumnTree::build(&defs(), ColumnDefaults::default());
        let catalog = tree.catalog(&flags);

        assert!(catalog.allows("name", |c| c.can_sort));
        // Display and group columns cannot sort or group
        assert!(!catalog.allows("column_2", |c| c.can_sort));
        assert!(!catalog.allows("column_1", |c| c.can_group));
        assert!(catalog.allows("column_1", |c| c.can_hide));
        assert!(!catalog.allows("missing", |_| true));
        assert_eq!(catalog.leaves_of("column_1").len(), 3);
    }
}
