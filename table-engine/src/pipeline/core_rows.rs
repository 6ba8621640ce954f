//! FILENAME: table-engine/src/pipeline/core_rows.rs
//! PURPOSE: Stage 1. One row per record, in input order, with resolved cells.

use std::rc::Rc;

use values::Record;

use crate::cell::Cell;
use crate::logging::log_debug;
use crate::pipeline::StageContext;
use crate::resolve::{resolve_cell, ResolveErrors, ResolveLog};
use crate::row::{Row, RowRef};
use crate::row_model::RowModel;

pub fn build<T: Record>(ctx: &StageContext<'_, T>, log: &mut ResolveLog) -> RowModel<T> {
    log.clear();
    let mut rows: Vec<RowRef<T>> = Vec::with_capacity(ctx.data.len());
    let mut errors = ResolveErrors::new();

    for (index, record) in ctx.data.iter().enumerate() {
        let id = match ctx.get_row_id {
            Some(get_row_id) => get_row_id(record, index),
            None => index.to_string(),
        };

        let cells: Vec<Cell> = ctx
            .tree
            .leaf_columns()
            .map(|column| match resolve_cell(record.as_ref(), column, &mut errors) {
                Some(value) => Cell::resolved(column.id(), value),
                None => Cell::placeholder(column.id()),
            })
            .collect();
        for error in errors.drain(..) {
            log.record(&id, error);
        }

        rows.push(Rc::new(Row::leaf(id, index, Rc::clone(record), cells)));
    }

    log_debug!(
        "PIPELINE",
        "core: {} rows, {} resolution failures",
        rows.len(),
        log.failures().len()
    );
    RowModel::flat(rows)
}
