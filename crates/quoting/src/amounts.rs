//! Amount aggregation over the line-item tree.
//!
//! A node's amount is, in priority order:
//! 1. its explicit override,
//! 2. `unit_price * quantity / 100` when the quantity is positive,
//! 3. the sum of its children's amounts.
//!
//! The first two set `amount_overridden`. Children of such a node still get
//! their own amounts; only the parent ignores their sum. The walk uses an
//! explicit stack and a visited set (fresh per top-level node); a child
//! already visited contributes zero instead of being descended into again.

use std::collections::HashSet;

use pricey_core::{Amount, LineItemId};

use crate::model::LineItem;
use crate::tree::{LineItemTree, NodeIndex};

/// The amount a line item carries on its own, if any.
pub fn intrinsic_amount(source: &LineItem) -> Option<Amount> {
    match source.amount {
        Some(amount) => Some(amount),
        None if source.quantity.is_positive() => {
            Some(Amount::extended(source.unit_price, source.quantity))
        }
        None => None,
    }
}

struct Frame {
    node: NodeIndex,
    next_child: usize,
    sum: Amount,
    /// The node's own amount; when set, the children's sum is not used.
    own: Option<Amount>,
}

enum Step {
    Descend(NodeIndex),
    Finish,
}

/// Compute `amount` / `amount_overridden` for every node reachable from a root.
pub fn aggregate_amounts(tree: &mut LineItemTree<'_>) {
    let roots = tree.roots().to_vec();
    for root in roots {
        let mut visited: HashSet<LineItemId> = HashSet::new();
        aggregate_from(tree, root, &mut visited);
    }
}

fn enter(tree: &LineItemTree<'_>, idx: NodeIndex) -> Frame {
    Frame {
        node: idx,
        next_child: 0,
        sum: Amount::ZERO,
        own: intrinsic_amount(tree.node(idx).source),
    }
}

/// Post-order walk from `root`. Every node gets an amount, including the
/// descendants of a node that carries its own amount.
fn aggregate_from(tree: &mut LineItemTree<'_>, root: NodeIndex, visited: &mut HashSet<LineItemId>) -> Amount {
    visited.insert(tree.node(root).item.id);

    let mut stack = vec![enter(tree, root)];
    let mut root_amount = Amount::ZERO;
    while let Some(top) = stack.last_mut() {
        let step = match tree.node(top.node).children.get(top.next_child) {
            Some(&child) => {
                top.next_child += 1;
                Step::Descend(child)
            }
            None => Step::Finish,
        };

        match step {
            Step::Descend(child) => {
                let child_id = tree.node(child).item.id;
                if !visited.insert(child_id) {
                    tracing::warn!(line_item_id = %child_id, "line item revisited while summing; counting it as zero");
                    continue;
                }
                let frame = enter(tree, child);
                stack.push(frame);
            }
            Step::Finish => {
                let Some(done) = stack.pop() else { break };
                let amount = done.own.unwrap_or(done.sum);
                let item = &mut tree.node_mut(done.node).item;
                item.amount = amount;
                item.amount_overridden = done.own.is_some();
                match stack.last_mut() {
                    Some(parent) => parent.sum += amount,
                    None => root_amount = amount,
                }
            }
        }
    }

    root_amount
}
