//! FILENAME: table-engine/src/pipeline/paginated.rs
//! PURPOSE: Stage 7. The current page of the visible rows.
//! CONTEXT: Pages either count every visible row, or count top-level rows
//! with each one carrying its visible descendants onto the same page.

use std::rc::Rc;

use crate::logging::log_debug;
use crate::options::FeatureFlags;
use crate::pipeline::StageContext;
use crate::row::RowRef;
use crate::row_model::{ModelRef, RowModel};

pub fn run<T>(model: &ModelRef<T>, ctx: &StageContext<'_, T>) -> ModelRef<T> {
    let Some(pagination) = ctx.state.pagination.filter(|_| ctx.flags.enable_pagination) else {
        return Rc::clone(model);
    };
    let size = pagination.page_size.max(1);
    let start = pagination.page_index.saturating_mul(size);

    let page: Vec<RowRef<T>> = if ctx.flags.paginate_expanded_rows {
        model.rows().iter().skip(start).take(size).cloned().collect()
    } else {
        segments(model.rows())
            .into_iter()
            .skip(start)
            .take(size)
            .flatten()
            .cloned()
            .collect()
    };

    log_debug!(
        "PIPELINE",
        "paginate: page {} of size {} -> {} rows",
        pagination.page_index,
        size,
        page.len()
    );
    Rc::new(RowModel::flat(page))
}

/// Rows pagination counts: every visible row, or only top-level rows.
pub fn pageable_count<T>(model: &RowModel<T>, flags: &FeatureFlags) -> usize {
    if flags.paginate_expanded_rows {
        model.len()
    } else {
        model.top_level_len()
    }
}

/// Splits the visible rows at each top-level row.
fn segments<T>(rows: &[RowRef<T>]) -> Vec<&[RowRef<T>]> {
    let mut out = Vec::new();
    let mut begin = 0;
    for (i, row) in rows.iter().enumerate().skip(1) {
        if row.depth() == 0 {
            out.push(&rows[begin..i]);
            begin = i;
        }
    }
    if begin < rows.len() {
        out.push(&rows[begin..]);
    }
    out
}
