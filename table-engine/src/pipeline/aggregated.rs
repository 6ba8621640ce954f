//! FILENAME: table-engine/src/pipeline/aggregated.rs
//! PURPOSE: Stage 5. Injects group summaries into group-row cells.
//! CONTEXT: Every non-preset cell of a group row is computed from the leaf rows
//! below it: the aggregation provider gets the first chance, then the column's
//! own aggregation function. Cells neither can compute stay placeholders.
//! The stage mutates summaries in place and returns the grouped model itself.

use std::rc::Rc;

use values::CellValue;

use crate::logging::log_debug;
use crate::pipeline::StageContext;
use crate::row_model::ModelRef;

pub fn run<T>(model: &ModelRef<T>, ctx: &StageContext<'_, T>) -> ModelRef<T> {
    let columns: Vec<_> = ctx.tree.leaf_columns().collect();
    let mut injected = 0usize;

    for row in model.flat_rows().iter().filter(|r| r.is_group_row()) {
        let leaves = row.leaf_rows();
        for (position, column) in columns.iter().enumerate() {
            let Some(cell) = row.cell_at(position) else {
                continue;
            };
            if cell.is_preset() {
                continue;
            }
            let values: Vec<CellValue> = leaves
                .iter()
                .map(|leaf| leaf.cell_at(position).map(|c| c.value()).unwrap_or_default())
                .collect();

            let summary = ctx
                .aggregation_provider
                .and_then(|provider| provider.aggregate(column.id(), &values))
                .or_else(|| column.def().aggregation_fn.as_ref().map(|f| f.aggregate(&values)));
            if let Some(value) = summary {
                cell.apply_aggregated_value(value);
                injected += 1;
            }
        }
    }

    if injected > 0 {
        log_debug!("PIPELINE", "aggregate: {} summaries injected", injected);
    }
    Rc::clone(model)
}
