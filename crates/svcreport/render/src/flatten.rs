//! Pre-order flattening of a resolved forest.

use svcreport_types::ServiceNode;
use tracing::warn;

use crate::row::DisplayRow;

/// Flatten `forest` into display rows: each root, then its children left to
/// right, recursively. `max_depth` is the number of service columns and
/// must be the forest's observed depth. A depth of 0 yields no rows.
pub fn flatten(forest: &[ServiceNode], max_depth: u32) -> Vec<DisplayRow> {
    if max_depth == 0 {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for root in forest {
        push_rows(root, max_depth, &mut rows);
    }
    rows
}

fn push_rows(node: &ServiceNode, max_depth: u32, rows: &mut Vec<DisplayRow>) {
    if node.depth_level > max_depth {
        warn!(
            service = %node.name,
            depth_level = node.depth_level,
            max_depth,
            "Service is deeper than the table; name span clamped to one column"
        );
    }

    rows.push(DisplayRow::from_node(node, max_depth));
    for child in &node.children {
        push_rows(child, max_depth, rows);
    }
}
