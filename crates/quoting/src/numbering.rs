//! Hierarchical numbering and nesting depth.

use std::collections::HashSet;

use pricey_core::LineItemId;

use crate::tree::{LineItemTree, NodeIndex};

/// Assign `number` ("2", "2.1", ...) and `depth` to every reachable node.
///
/// Depth-first and sibling-ordered; sibling indices start at 1. The visited set
/// spans the whole walk and is independent of the amount pass: a node reached
/// a second time keeps its first number and its subtree is not re-entered.
pub fn assign_numbers(tree: &mut LineItemTree<'_>) {
    let mut visited: HashSet<LineItemId> = HashSet::new();
    // (node, parent number, depth, sibling position)
    let mut stack: Vec<(NodeIndex, Option<String>, u32, usize)> = tree
        .roots()
        .iter()
        .enumerate()
        .rev()
        .map(|(pos, &idx)| (idx, None, 0, pos))
        .collect();

    while let Some((idx, parent_number, depth, pos)) = stack.pop() {
        let id = tree.node(idx).item.id;
        if !visited.insert(id) {
            tracing::warn!(line_item_id = %id, "line item revisited while numbering; skipping");
            continue;
        }

        let number = match parent_number {
            Some(parent) => format!("{parent}.{}", pos + 1),
            None => (pos + 1).to_string(),
        };

        let node = tree.node_mut(idx);
        node.item.depth = depth;
        node.item.number = number.clone();

        stack.extend(
            node.children
                .iter()
                .enumerate()
                .rev()
                .map(|(child_pos, &child)| (child, Some(number.clone()), depth + 1, child_pos)),
        );
    }
}
