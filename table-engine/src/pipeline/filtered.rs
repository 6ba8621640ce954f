//! FILENAME: table-engine/src/pipeline/filtered.rs
//! PURPOSE: Stage 2. Keeps rows passing every column filter, the global filter
//! and the quick filter. Order is preserved.

use std::rc::Rc;

use crate::features::filtering::{contains_text, matches_column_filter, matches_global_filter};
use crate::logging::log_debug;
use crate::pipeline::StageContext;
use crate::row::Row;
use crate::row_model::{ModelRef, RowModel};
use crate::state::FilterValue;

/// One active column filter, resolved to a leaf position.
struct ActiveFilter<'a> {
    position: usize,
    value: &'a FilterValue,
}

pub fn run<T>(model: &ModelRef<T>, ctx: &StageContext<'_, T>) -> ModelRef<T> {
    let filters: Vec<ActiveFilter<'_>> = if ctx.flags.enable_column_filters {
        ctx.state
            .column_filters
            .iter()
            .filter_map(|f| {
                let column = ctx.tree.get(&f.id)?;
                if !column.can_filter(ctx.flags) {
                    return None;
                }
                Some(ActiveFilter {
                    position: ctx.tree.leaf_position(column.id())?,
                    value: &f.value,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let global = ctx
        .state
        .global_filter
        .as_ref()
        .filter(|f| ctx.flags.enable_global_filter && !f.is_inert());
    let quick = ctx
        .quick_filter
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    if filters.is_empty() && global.is_none() && quick.is_none() {
        return Rc::clone(model);
    }

    let searchable: Vec<usize> = ctx
        .tree
        .leaf_columns()
        .enumerate()
        .filter(|(_, c)| c.can_global_filter(ctx.flags))
        .map(|(i, _)| i)
        .collect();

    let passes = |row: &Row<T>| -> bool {
        let cells = row.row_cells();
        let column_ok = filters.iter().all(|f| {
            let value = row.cell_at(f.position).map(|c| c.value()).unwrap_or_default();
            matches_column_filter(&value, f.value, &cells)
        });
        if !column_ok {
            return false;
        }
        let searchable_cells = || searchable.iter().filter_map(|i| row.cell_at(*i));
        if let Some(filter) = global {
            if !matches_global_filter(filter, searchable_cells(), &cells) {
                return false;
            }
        }
        match &quick {
            Some(needle) => searchable_cells().any(|c| contains_text(&c.value(), needle)),
            None => true,
        }
    };

    let rows: Vec<_> = model.rows().iter().filter(|r| passes(r)).cloned().collect();
    log_debug!(
        "PIPELINE",
        "filter: {} -> {} rows ({} column filters, global={}, quick={})",
        model.len(),
        rows.len(),
        filters.len(),
        global.is_some(),
        quick.is_some()
    );
    Rc::new(RowModel::flat(rows))
}
