//! FILENAME: table-engine/src/pipeline/grouped.rs
//! PURPOSE: Stage 4. Recursive partition of the sorted rows into group rows.
//! CONTEXT: Level k partitions the rows of its parent group by the k-th
//! grouping column's value. Groups appear in first-occurrence order, so the
//! sort order carries through to both groups and leaves. Leaf rows are
//! re-attached under their innermost group with the matching depth.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use values::{CellValue, ValueKey};

use crate::cell::Cell;
use crate::features::grouping::{group_row_id, unique_group_id};
use crate::logging::log_debug;
use crate::pipeline::StageContext;
use crate::row::{Row, RowRef};
use crate::row_model::{ModelRef, RowModel};

/// A grouping column resolved to its leaf position.
struct GroupLevel<'a> {
    column_id: &'a str,
    position: usize,
}

/// Key of an enclosing group, preset on every row below it.
struct AncestorKey {
    position: usize,
    key: CellValue,
}

struct GroupBuilder<'a> {
    levels: Vec<GroupLevel<'a>>,
    leaf_ids: Vec<&'a str>,
    taken_ids: FxHashSet<String>,
    group_count: usize,
}

pub fn run<T>(model: &ModelRef<T>, ctx: &StageContext<'_, T>) -> ModelRef<T> {
    let levels: Vec<GroupLevel<'_>> = ctx
        .active_grouping()
        .iter()
        .filter_map(|id| {
            let column = ctx.tree.get(id)?;
            if !column.can_group(ctx.flags) {
                return None;
            }
            Some(GroupLevel {
                column_id: column.id(),
                position: ctx.tree.leaf_position(column.id())?,
            })
        })
        .collect();
    if levels.is_empty() {
        return Rc::clone(model);
    }

    let mut builder = GroupBuilder {
        levels,
        leaf_ids: ctx.tree.leaf_columns().map(|c| c.id()).collect(),
        taken_ids: FxHashSet::default(),
        group_count: 0,
    };
    let mut ancestors = Vec::new();
    let rows = builder.build_level(model.rows(), 0, None, &mut ancestors);

    let mut flat_rows = Vec::with_capacity(model.len() + builder.group_count);
    flatten(&rows, &mut flat_rows);
    log_debug!(
        "PIPELINE",
        "group: {} leaves into {} groups over {} levels ({} top-level)",
        model.len(),
        builder.group_count,
        builder.levels.len(),
        rows.len()
    );
    Rc::new(RowModel::new(rows, flat_rows))
}

impl GroupBuilder<'_> {
    fn build_level<T>(
        &mut self,
        rows: &[RowRef<T>],
        depth: usize,
        parent_id: Option<&str>,
        ancestors: &mut Vec<AncestorKey>,
    ) -> Vec<RowRef<T>> {
        let Some(level) = self.levels.get(depth) else {
            return match parent_id {
                Some(parent) => rows
                    .iter()
                    .map(|row| Rc::new(row.reparented(parent, depth)))
                    .collect(),
                None => rows.to_vec(),
            };
        };
        let (column_id, position) = (level.column_id, level.position);

        // Partition in first-occurrence order
        let mut slots: FxHashMap<ValueKey, usize> = FxHashMap::default();
        let mut partitions: Vec<(CellValue, Vec<RowRef<T>>)> = Vec::new();
        for row in rows {
            let key = row.cell_at(position).map(|c| c.value()).unwrap_or_default();
            match slots.get(&ValueKey::from(&key)) {
                Some(&slot) => partitions[slot].1.push(Rc::clone(row)),
                None => {
                    slots.insert(ValueKey::from(&key), partitions.len());
                    partitions.push((key, vec![Rc::clone(row)]));
                }
            }
        }

        let mut groups = Vec::with_capacity(partitions.len());
        for (key, members) in partitions {
            let id = unique_group_id(group_row_id(parent_id, column_id, &key), &mut self.taken_ids);

            ancestors.push(AncestorKey {
                position,
                key: key.clone(),
            });
            let sub_rows = self.build_level(&members, depth + 1, Some(id.as_str()), ancestors);
            ancestors.pop();

            let cells = self.group_cells(position, &key, ancestors);
            self.group_count += 1;
            groups.push(Rc::new(Row::group(
                id,
                depth,
                parent_id.map(str::to_string),
                column_id.to_string(),
                key,
                cells,
                sub_rows,
            )));
        }
        groups
    }

    /// Own key and ancestor keys are preset; every other cell waits for the
    /// aggregate stage.
    fn group_cells(&self, position: usize, key: &CellValue, ancestors: &[AncestorKey]) -> Vec<Cell> {
        self.leaf_ids
            .iter()
            .enumerate()
            .map(|(i, column_id)| {
                if i == position {
                    Cell::preset(*column_id, key.clone(), true)
                } else if let Some(ancestor) = ancestors.iter().find(|a| a.position == i) {
                    Cell::preset(*column_id, ancestor.key.clone(), false)
                } else {
                    Cell::placeholder(*column_id)
                }
            })
            .collect()
    }
}

/// Pre-order: each group row followed by its descendants.
fn flatten<T>(rows: &[RowRef<T>], out: &mut Vec<RowRef<T>>) {
    for row in rows {
        out.push(Rc::clone(row));
        flatten(row.sub_rows(), out);
    }
}
