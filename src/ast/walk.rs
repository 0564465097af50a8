//! Depth-first traversal over any node.

use std::collections::BTreeMap;

use super::{Node, NodeKind};

/// Visits `root` and every descendant in pre-order (parents before
/// children, siblings in source order).
pub fn walk<'a>(root: &'a dyn Node, visit: &mut dyn FnMut(&'a dyn Node)) {
    visit(root);
    root.visit_children(&mut |child| walk(child, visit));
}

/// All nodes reachable from `root`, in pre-order.
pub fn descendants(root: &dyn Node) -> Vec<&dyn Node> {
    let mut nodes = Vec::new();
    walk(root, &mut |node| nodes.push(node));
    nodes
}

/// How many nodes of each kind appear under (and including) `root`.
pub fn kind_counts(root: &dyn Node) -> BTreeMap<NodeKind, usize> {
    let mut counts = BTreeMap::new();
    walk(root, &mut |node| *counts.entry(node.kind()).or_insert(0) += 1);
    counts
}
