//! Line-item tree reconstruction from parent pointers.
//!
//! Line items only know their parent (`parent_id`). The builder turns the flat,
//! declaration-ordered list into an arena of nodes with explicit child lists.
//! The parent graph is user-editable and may be broken, so:
//!
//! - ids that did not resolve are skipped, and repeated ids keep their first
//!   occurrence;
//! - an item whose parent is not part of the resolved quote is an orphan and
//!   is promoted to top level;
//! - an item lying on a parent-pointer cycle is promoted to top level too,
//!   since its ancestry never reaches a root.
//!
//! Source records are borrowed, never mutated.

use std::collections::HashMap;

use pricey_core::{Entity, LineItemId};

use crate::model::LineItem;
use crate::printable::PrintableLineItem;
use crate::references::ResolvedReferences;

/// Position of a node in the tree arena.
pub type NodeIndex = usize;

#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    pub source: &'a LineItem,
    pub item: PrintableLineItem,
    pub children: Vec<NodeIndex>,
}

/// Arena-backed line-item forest for one quote.
#[derive(Debug, Clone, Default)]
pub struct LineItemTree<'a> {
    nodes: Vec<TreeNode<'a>>,
    roots: Vec<NodeIndex>,
}

impl<'a> LineItemTree<'a> {
    /// Build the forest from the quote's declared order.
    pub fn build(declared: &[LineItemId], refs: &'a ResolvedReferences) -> Self {
        let mut nodes = Vec::with_capacity(declared.len());
        let mut index: HashMap<LineItemId, NodeIndex> = HashMap::with_capacity(declared.len());

        for id in declared {
            if index.contains_key(id) {
                tracing::debug!(line_item_id = %id, "skipping repeated line item id");
                continue;
            }
            let Some(source) = refs.line_items.get(id) else {
                tracing::debug!(line_item_id = %id, "line item did not resolve; skipping");
                continue;
            };
            let image = refs.image(source.image_id).cloned();
            index.insert(source.id(), nodes.len());
            nodes.push(TreeNode {
                source,
                item: PrintableLineItem::from_line_item(source, image),
                children: Vec::new(),
            });
        }

        let parent_of = |idx: NodeIndex| -> Option<NodeIndex> {
            nodes[idx].source.parent_id.and_then(|p| index.get(&p).copied())
        };

        let on_cycle = cycle_members(nodes.len(), parent_of);
        let mut roots = Vec::new();
        let mut attachments = Vec::with_capacity(nodes.len());
        for idx in 0..nodes.len() {
            let source = nodes[idx].source;
            let Some(parent_id) = source.parent_id else {
                roots.push(idx);
                continue;
            };
            match parent_of(idx) {
                None => {
                    tracing::warn!(
                        line_item_id = %source.id,
                        parent_id = %parent_id,
                        "parent line item not found; promoting to top level"
                    );
                    roots.push(idx);
                }
                Some(_) if on_cycle[idx] => {
                    tracing::warn!(
                        line_item_id = %source.id,
                        parent_id = %parent_id,
                        "line item is part of a parent cycle; promoting to top level"
                    );
                    roots.push(idx);
                }
                Some(parent) => attachments.push((parent, idx)),
            }
        }

        for (parent, child) in attachments {
            nodes[parent].children.push(child);
        }

        Self { nodes, roots }
    }

    /// Assemble a tree from raw parts, without any validation.
    ///
    /// Used to exercise the traversal guards on shapes `build` never produces.
    #[cfg(test)]
    pub(crate) fn from_parts(nodes: Vec<TreeNode<'a>>, roots: Vec<NodeIndex>) -> Self {
        Self { nodes, roots }
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn node(&self, idx: NodeIndex) -> &TreeNode<'a> {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut TreeNode<'a> {
        &mut self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Computed items of the top-level nodes, in order.
    pub fn top_level(&self) -> impl Iterator<Item = &PrintableLineItem> {
        self.roots.iter().map(|&idx| &self.nodes[idx].item)
    }

    /// Nest the computed items into owned `PrintableLineItem` trees.
    ///
    /// Each node is emitted at most once; a repeated reference is dropped.
    pub fn into_forest(self) -> Vec<PrintableLineItem> {
        let mut slots: Vec<Option<(PrintableLineItem, Vec<NodeIndex>)>> = self
            .nodes
            .into_iter()
            .map(|node| Some((node.item, node.children)))
            .collect();

        let mut forest = Vec::with_capacity(self.roots.len());
        for &root in &self.roots {
            let Some(root) = take_slot(&mut slots, root) else {
                continue;
            };
            let mut stack = vec![root];
            while let Some(top) = stack.last_mut() {
                let next = top.children.get(top.next_child).copied();
                top.next_child += 1;
                match next {
                    Some(child) => {
                        if let Some(pending) = take_slot(&mut slots, child) {
                            stack.push(pending);
                        }
                    }
                    None => {
                        let Some(done) = stack.pop() else { break };
                        match stack.last_mut() {
                            Some(parent) => parent.item.sub_items.push(done.item),
                            None => forest.push(done.item),
                        }
                    }
                }
            }
        }
        forest
    }
}

/// An item whose children are still being collected into `sub_items`.
struct Pending {
    item: PrintableLineItem,
    children: Vec<NodeIndex>,
    next_child: usize,
}

fn take_slot(
    slots: &mut [Option<(PrintableLineItem, Vec<NodeIndex>)>],
    idx: NodeIndex,
) -> Option<Pending> {
    let (item, children) = slots.get_mut(idx).and_then(Option::take)?;
    Some(Pending {
        item,
        children,
        next_child: 0,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unseen,
    OnPath,
    Done,
}

/// Flag every node whose parent chain leads back to itself.
///
/// Each node is walked at most once across all chains, so the pass is
/// linear in the number of nodes.
fn cycle_members(len: usize, parent_of: impl Fn(NodeIndex) -> Option<NodeIndex>) -> Vec<bool> {
    let mut marks = vec![Mark::Unseen; len];
    let mut on_cycle = vec![false; len];
    let mut path = Vec::new();

    for start in 0..len {
        let mut current = Some(start);
        while let Some(idx) = current {
            match marks[idx] {
                Mark::Done => break,
                Mark::OnPath => {
                    // The chain closed on itself; everything from `idx` on is the loop.
                    if let Some(pos) = path.iter().position(|&p| p == idx) {
                        for &member in &path[pos..] {
                            on_cycle[member] = true;
                        }
                    }
                    break;
                }
                Mark::Unseen => {
                    marks[idx] = Mark::OnPath;
                    path.push(idx);
                    current = parent_of(idx);
                }
            }
        }
        for idx in path.drain(..) {
            marks[idx] = Mark::Done;
        }
    }

    on_cycle
}
