//! FILENAME: table-engine/src/header.rs
//! PURPOSE: Header and footer groups derived from the visible column layout.
//! CONTEXT: One group per depth level. At each level, consecutive visible
//! leaves sharing an ancestor at that depth merge into one header whose
//! col-span is the number of leaves covered. A leaf shallower than the deepest
//! level appears once, at its own depth, spanning the rows below it.

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnTree};
use crate::features::column_layout::ColumnLayout;
use crate::state::{PinPosition, TableState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// `"{depth}_{column_id}"`, plus a region suffix for pinned headers and an
    /// index suffix when a group header is split.
    pub id: String,
    pub column_id: String,
    pub label: String,
    pub depth: usize,
    /// Position within its group.
    pub index: usize,
    pub col_span: usize,
    pub row_span: usize,
    /// Sum of the covered leaves' sizes.
    pub size: f64,
    pub pinned: Option<PinPosition>,
    pub is_leaf: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderGroup {
    pub id: String,
    pub depth: usize,
    pub headers: Vec<Header>,
}

/// Which label a header carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLabel {
    Header,
    Footer,
}

pub fn build_header_groups<T>(
    tree: &ColumnTree<T>,
    layout: &ColumnLayout,
    state: &TableState,
    label: HeaderLabel,
) -> Vec<HeaderGroup> {
    if layout.is_empty() {
        return Vec::new();
    }
    let max_depth = tree.max_depth();
    let regions: [(Option<PinPosition>, &[usize]); 3] = [
        (Some(PinPosition::Left), &layout.left),
        (None, &layout.center),
        (Some(PinPosition::Right), &layout.right),
    ];

    let mut groups = Vec::with_capacity(max_depth + 1);
    for depth in 0..=max_depth {
        let mut headers: Vec<Header> = Vec::new();
        for (pinned, leaves) in regions {
            let mut open: Option<usize> = None;
            for leaf in leaves.iter().filter_map(|i| tree.at(*i)) {
                let Some(owner) = tree.ancestor_at(leaf, depth) else {
                    // Leaf sits above this level; it already spans down.
                    open = None;
                    continue;
                };
                let size = leaf.size(state);
                if let Some(last) = open.and_then(|i| headers.get_mut(i)) {
                    if last.column_id == owner.id() {
                        last.col_span += 1;
                        last.size += size;
                        continue;
                    }
                }
                let mut header = new_header(owner, depth, max_depth, headers.len(), size, pinned, label);
                if headers.iter().any(|h| h.id == header.id) {
                    header.id = format!("{}_{}", header.id, header.index);
                }
                headers.push(header);
                open = Some(headers.len() - 1);
            }
        }
        if headers.is_empty() {
            continue;
        }
        groups.push(HeaderGroup {
            id: depth.to_string(),
            depth,
            headers,
        });
    }
    groups
}

fn new_header<T>(
    column: &Column<T>,
    depth: usize,
    max_depth: usize,
    index: usize,
    size: f64,
    pinned: Option<PinPosition>,
    label: HeaderLabel,
) -> Header {
    let id = match pinned {
        Some(PinPosition::Left) => format!("{}_{}_left", depth, column.id()),
        Some(PinPosition::Right) => format!("{}_{}_right", depth, column.id()),
        None => format!("{}_{}", depth, column.id()),
    };
    let label = match label {
        HeaderLabel::Header => column.header_label(),
        HeaderLabel::Footer => column.footer_label(),
    };
    Header {
        id,
        column_id: column.id().to_string(),
        label: label.to_string(),
        depth,
        index,
        col_span: 1,
        row_span: if column.is_leaf() { max_depth - depth + 1 } else { 1 },
        size,
        pinned,
        is_leaf: column.is_leaf(),
    }
}

/// Footer groups: header groups with footer labels, deepest level first.
pub fn build_footer_groups<T>(tree: &ColumnTree<T>, layout: &ColumnLayout, state: &TableState) -> Vec<HeaderGroup> {
    let mut groups = build_header_groups(tree, layout, state, HeaderLabel::Footer);
    groups.reverse();
    groups
}
