//! FILENAME: table-engine/src/pipeline/sorted.rs
//! PURPOSE: Stage 3. Stable multi-key sort of the filtered rows.
//! CONTEXT: Keys are extracted once per row, then compared entry by entry in
//! sorting-list order. Rows comparing equal on every key keep their
//! filtered order.

use std::cmp::Ordering;
use std::rc::Rc;

use smallvec::SmallVec;
use values::CellValue;

use crate::features::sorting::{compare_for_sort, SortingFn};
use crate::logging::log_debug;
use crate::pipeline::StageContext;
use crate::row::RowRef;
use crate::row_model::{ModelRef, RowModel};

struct ActiveSort<'a> {
    position: usize,
    sorting_fn: &'a SortingFn,
    desc: bool,
    invert: bool,
}

type SortKeys = SmallVec<[CellValue; 4]>;

pub fn run<T>(model: &ModelRef<T>, ctx: &StageContext<'_, T>) -> ModelRef<T> {
    if !ctx.flags.enable_sorting || ctx.state.sorting.is_empty() {
        return Rc::clone(model);
    }

    let sorts: Vec<ActiveSort<'_>> = ctx
        .state
        .sorting
        .iter()
        .filter_map(|s| {
            let column = ctx.tree.get(&s.id)?;
            if !column.can_sort(ctx.flags) {
                return None;
            }
            Some(ActiveSort {
                position: ctx.tree.leaf_position(column.id())?,
                sorting_fn: &column.def().sorting_fn,
                desc: s.desc,
                invert: column.def().invert_sorting,
            })
        })
        .collect();
    if sorts.is_empty() {
        return Rc::clone(model);
    }

    let mut keyed: Vec<(SortKeys, &RowRef<T>)> = model
        .rows()
        .iter()
        .map(|row| {
            let keys = sorts
                .iter()
                .map(|s| row.cell_at(s.position).map(|c| c.value()).unwrap_or_default())
                .collect();
            (keys, row)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        sorts
            .iter()
            .zip(a.iter().zip(b.iter()))
            .map(|(s, (x, y))| compare_for_sort(x, y, s.sorting_fn, s.desc, s.invert))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    let rows: Vec<RowRef<T>> = keyed.into_iter().map(|(_, row)| Rc::clone(row)).collect();
    log_debug!("PIPELINE", "sort: {} rows by {} keys", rows.len(), sorts.len());
    Rc::new(RowModel::flat(rows))
}
