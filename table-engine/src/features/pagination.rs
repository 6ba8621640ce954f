//! FILENAME: table-engine/src/features/pagination.rs
//! PURPOSE: Page math, pagination normalization and page-index clamping.

use crate::features::{FeatureContext, ReconcileContext, TableFeature};
use crate::state::TableState;

/// `ceil(rows / page_size)`; zero rows means zero pages.
pub fn page_count(rows: usize, page_size: usize) -> usize {
    rows.div_ceil(page_size.max(1))
}

/// Largest valid page index for `rows` (0 when there are no rows).
pub fn max_page_index(rows: usize, page_size: usize) -> usize {
    page_count(rows, page_size).saturating_sub(1)
}

/// Page size at least 1. Jumps back to the first page when filters, sorting or
/// grouping change and the caller did not set the page itself.
/// After the pipeline runs, clamps the page index into range.
pub struct PaginationFeature;

impl TableFeature for PaginationFeature {
    fn name(&self) -> &'static str {
        "pagination"
    }

    fn normalize(&self, ctx: &FeatureContext<'_>, state: &mut TableState) {
        let previous = ctx.previous;
        let rows_changed = state.column_filters != previous.column_filters
            || state.global_filter != previous.global_filter
            || state.sorting != previous.sorting
            || state.grouping != previous.grouping;
        let pagination_touched = state.pagination != previous.pagination;

        if let Some(pagination) = state.pagination.as_mut() {
            pagination.page_size = pagination.page_size.max(1);
            if ctx.flags.auto_reset_page_index && rows_changed && !pagination_touched {
                pagination.page_index = 0;
            }
        }
    }

    fn reconcile(&self, ctx: &ReconcileContext<'_>, state: &mut TableState) {
        if !ctx.flags.enable_pagination {
            return;
        }
        if let Some(pagination) = state.pagination.as_mut() {
            let max = max_page_index(ctx.pageable_rows, pagination.page_size);
            if pagination.page_index > max {
                pagination.page_index = max;
            }
        }
    }
}
