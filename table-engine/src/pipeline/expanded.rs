//! FILENAME: table-engine/src/pipeline/expanded.rs
//! PURPOSE: Stage 6. Visible rows of the group tree, depth first.

use std::rc::Rc;

use crate::pipeline::StageContext;
use crate::row::RowRef;
use crate::row_model::{ModelRef, RowModel};
use crate::state::TableState;

/// A row is emitted when every ancestor is expanded. Without grouping the
/// aggregated model passes through.
pub fn run<T>(model: &ModelRef<T>, ctx: &StageContext<'_, T>) -> ModelRef<T> {
    if ctx.active_grouping().is_empty() || !model.rows().iter().any(|r| r.is_group_row()) {
        return Rc::clone(model);
    }
    let mut visible = Vec::with_capacity(model.len());
    walk(model.rows(), ctx.state, &mut visible);
    Rc::new(RowModel::with_rows_of(visible, model))
}

fn walk<T>(rows: &[RowRef<T>], state: &TableState, out: &mut Vec<RowRef<T>>) {
    for row in rows {
        out.push(Rc::clone(row));
        if row.is_expanded(state) {
            walk(row.sub_rows(), state, out);
        }
    }
}
