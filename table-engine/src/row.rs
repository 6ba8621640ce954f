//! FILENAME: table-engine/src/row.rs
//! PURPOSE: Row entity shared by every row model.
//! CONTEXT: A row wraps one record, or for group rows a group key, and owns one
//! `Cell` per leaf column in leaf declaration order. Rows are reference counted
//! so filtered, sorted and paged models share them instead of copying.

use std::rc::Rc;

use values::CellValue;

use crate::cell::Cell;
use crate::state::TableState;

pub type RowRef<T> = Rc<Row<T>>;

pub struct Row<T> {
    id: String,
    /// Position in the core sequence. Group rows take their first leaf's index.
    index: usize,
    depth: usize,
    parent_id: Option<String>,
    original: Option<Rc<T>>,
    cells: Rc<[Cell]>,
    sub_rows: Vec<RowRef<T>>,
    group_column_id: Option<String>,
    group_key: Option<CellValue>,
    display_index: std::cell::Cell<Option<usize>>,
    root_display_index: std::cell::Cell<Option<usize>>,
}

impl<T> Row<T> {
    pub(crate) fn leaf(id: String, index: usize, original: Rc<T>, cells: Vec<Cell>) -> Self {
        Row {
            id,
            index,
            depth: 0,
            parent_id: None,
            original: Some(original),
            cells: cells.into(),
            sub_rows: Vec::new(),
            group_column_id: None,
            group_key: None,
            display_index: std::cell::Cell::new(None),
            root_display_index: std::cell::Cell::new(None),
        }
    }

    pub(crate) fn group(
        id: String,
        depth: usize,
        parent_id: Option<String>,
        group_column_id: String,
        group_key: CellValue,
        cells: Vec<Cell>,
        sub_rows: Vec<RowRef<T>>,
    ) -> Self {
        let index = sub_rows.first().map_or(0, |r| r.index);
        Row {
            id,
            index,
            depth,
            parent_id,
            original: None,
            cells: cells.into(),
            sub_rows,
            group_column_id: Some(group_column_id),
            group_key: Some(group_key),
            display_index: std::cell::Cell::new(None),
            root_display_index: std::cell::Cell::new(None),
        }
    }

    /// Copy of a leaf row attached under a group row. Cells and record are shared.
    pub(crate) fn reparented(&self, parent_id: &str, depth: usize) -> Self {
        Row {
            id: self.id.clone(),
            index: self.index,
            depth,
            parent_id: Some(parent_id.to_string()),
            original: self.original.clone(),
            cells: Rc::clone(&self.cells),
            sub_rows: Vec::new(),
            group_column_id: None,
            group_key: None,
            display_index: std::cell::Cell::new(None),
            root_display_index: std::cell::Cell::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// The wrapped record. None for group rows.
    pub fn original(&self) -> Option<&T> {
        self.original.as_deref()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, column_id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column_id() == column_id)
    }

    /// Cell by leaf position.
    pub fn cell_at(&self, position: usize) -> Option<&Cell> {
        self.cells.get(position)
    }

    /// Cached cell value, Empty when the column is unknown.
    pub fn value(&self, column_id: &str) -> CellValue {
        self.cell(column_id).map(Cell::value).unwrap_or_default()
    }

    pub fn sub_rows(&self) -> &[RowRef<T>] {
        &self.sub_rows
    }

    pub fn is_group_row(&self) -> bool {
        self.group_column_id.is_some()
    }

    pub fn group_column_id(&self) -> Option<&str> {
        self.group_column_id.as_deref()
    }

    pub fn group_key(&self) -> Option<&CellValue> {
        self.group_key.as_ref()
    }

    pub fn can_expand(&self) -> bool {
        !self.sub_rows.is_empty()
    }

    pub fn is_expanded(&self, state: &TableState) -> bool {
        self.can_expand() && state.expanded.is_expanded(&self.id)
    }

    /// Group rows count as selected once all their leaves are.
    pub fn is_selected(&self, state: &TableState) -> bool {
        if self.is_group_row() {
            let leaves = self.leaf_rows();
            !leaves.is_empty() && leaves.iter().all(|r| state.is_row_selected(r.id()))
        } else {
            state.is_row_selected(&self.id)
        }
    }

    pub fn is_some_selected(&self, state: &TableState) -> bool {
        self.leaf_rows().iter().any(|r| state.is_row_selected(r.id()))
    }

    /// Every non-group descendant, depth first. Empty for leaf rows.
    pub fn leaf_rows(&self) -> Vec<RowRef<T>> {
        let mut leaves = Vec::new();
        collect_leaves(&self.sub_rows, &mut leaves);
        leaves
    }

    pub fn display_index(&self) -> Option<usize> {
        self.display_index.get()
    }

    /// Position among the rendered top-level rows.
    pub fn root_display_index(&self) -> Option<usize> {
        self.root_display_index.get()
    }

    pub(crate) fn set_display_index(&self, index: Option<usize>, root_index: Option<usize>) {
        self.display_index.set(index);
        self.root_display_index.set(root_index);
    }

    pub fn row_cells(&self) -> RowCells<'_> {
        RowCells {
            row_id: &self.id,
            index: self.index,
            cells: &self.cells,
        }
    }
}

fn collect_leaves<T>(rows: &[RowRef<T>], out: &mut Vec<RowRef<T>>) {
    for row in rows {
        if row.is_group_row() {
            collect_leaves(&row.sub_rows, out);
        } else {
            out.push(Rc::clone(row));
        }
    }
}

impl<T> std::fmt::Debug for Row<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("depth", &self.depth)
            .field("group_key", &self.group_key)
            .field("sub_rows", &self.sub_rows.len())
            .field("display_index", &self.display_index.get())
            .finish()
    }
}

// ============================================================================
// ROW CELLS VIEW
// ============================================================================

/// Type-erased view of a row used by row predicates.
#[derive(Debug, Clone, Copy)]
pub struct RowCells<'a> {
    row_id: &'a str,
    index: usize,
    cells: &'a [Cell],
}

impl<'a> RowCells<'a> {
    #[cfg(test)]
    pub(crate) fn empty() -> RowCells<'static> {
        RowCells {
            row_id: "",
            index: 0,
            cells: &[],
        }
    }

    pub fn row_id(&self) -> &'a str {
        self.row_id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column_id: &str) -> Option<CellValue> {
        self.cells
            .iter()
            .find(|c| c.column_id() == column_id)
            .map(Cell::value)
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Cell> {
        self.cells.iter()
    }
}
