//! FILENAME: table-engine/src/row_model.rs
//! Row Model - Immutable snapshot produced by one pipeline stage.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::logging::log_warn;
use crate::row::RowRef;

pub type ModelRef<T> = Rc<RowModel<T>>;

/// Top-level `rows`, their pre-order flattening and an id index.
pub struct RowModel<T> {
    rows: Vec<RowRef<T>>,
    flat_rows: Vec<RowRef<T>>,
    rows_by_id: Rc<FxHashMap<String, RowRef<T>>>,
}

impl<T> RowModel<T> {
    pub fn empty() -> Self {
        RowModel {
            rows: Vec::new(),
            flat_rows: Vec::new(),
            rows_by_id: Rc::new(FxHashMap::default()),
        }
    }

    /// Indexes `flat_rows` by id. On duplicate ids the first row wins.
    pub(crate) fn new(rows: Vec<RowRef<T>>, flat_rows: Vec<RowRef<T>>) -> Self {
        let mut rows_by_id = FxHashMap::default();
        rows_by_id.reserve(flat_rows.len());
        for row in &flat_rows {
            if rows_by_id.contains_key(row.id()) {
                log_warn!("PIPELINE", "duplicate row id '{}'", row.id());
                continue;
            }
            rows_by_id.insert(row.id().to_string(), Rc::clone(row));
        }
        RowModel {
            rows,
            flat_rows,
            rows_by_id: Rc::new(rows_by_id),
        }
    }

    /// Model whose rows are already flat (no hierarchy).
    pub(crate) fn flat(rows: Vec<RowRef<T>>) -> Self {
        let flat_rows = rows.clone();
        RowModel::new(rows, flat_rows)
    }

    /// New visible row list over the flattening and index of `source`.
    pub(crate) fn with_rows_of(rows: Vec<RowRef<T>>, source: &RowModel<T>) -> Self {
        RowModel {
            rows,
            flat_rows: source.flat_rows.clone(),
            rows_by_id: Rc::clone(&source.rows_by_id),
        }
    }

    pub fn rows(&self) -> &[RowRef<T>] {
        &self.rows
    }

    pub fn flat_rows(&self) -> &[RowRef<T>] {
        &self.flat_rows
    }

    pub fn row(&self, id: &str) -> Option<&RowRef<T>> {
        self.rows_by_id.get(id)
    }

    pub fn rows_by_id(&self) -> &FxHashMap<String, RowRef<T>> {
        &self.rows_by_id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn top_level_len(&self) -> usize {
        self.rows.iter().filter(|r| r.depth() == 0).count()
    }

    pub fn row_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.id()).collect()
    }
}

impl<T> Default for RowModel<T> {
    fn default() -> Self {
        RowModel::empty()
    }
}

impl<T> std::fmt::Debug for RowModel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowModel")
            .field("rows", &self.rows.len())
            .field("flat_rows", &self.flat_rows.len())
            .finish()
    }
}
