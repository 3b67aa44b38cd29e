//! PUCT selection and value backup over a [`SearchTree`].
//!
//! Selection descends from the root, at every node with children taking the
//! child with the highest score
//!
//! ```text
//! Q(n) + c_puct × P(n) × sqrt(Σ N(siblings)) / (1 + N(n))
//! ```
//!
//! where the sum runs over all children of n's parent, n included. Ties go
//! to the child created first.

use crate::mcts::node::NodeId;
use crate::mcts::tree::SearchTree;

/// PUCT score of a non-root node.
pub fn puct(tree: &SearchTree, id: NodeId, c_puct: f64) -> f64 {
    let node = tree.node(id);
    let sibling_visits: u32 = node
        .parent()
        .map(|parent| {
            tree.children(parent)
                .iter()
                .map(|&sibling| tree.node(sibling).visit_count)
                .sum()
        })
        .unwrap_or(node.visit_count);

    let exploration = c_puct * node.prior_probability * (sibling_visits as f64).sqrt()
        / (1.0 + node.visit_count as f64);
    node.mean_action() + exploration
}

/// Child of `id` with the highest PUCT score, or `None` for a leaf.
pub fn select_best_child(tree: &SearchTree, id: NodeId, c_puct: f64) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for &child in tree.children(id) {
        let score = puct(tree, child, c_puct);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((child, score)),
        }
    }
    best.map(|(child, _)| child)
}

/// Descend from the root to the first node without children.
pub fn select_leaf(tree: &SearchTree, c_puct: f64) -> NodeId {
    let mut current = NodeId::ROOT;
    while let Some(child) = select_best_child(tree, current, c_puct) {
        current = child;
    }
    current
}

/// Add `value` to `id` and every ancestor up to and including the root.
///
/// The same value is applied at every level, without discounting.
pub fn backpropagate(tree: &mut SearchTree, id: NodeId, value: f64) {
    let mut current = Some(id);
    while let Some(node_id) = current {
        let node = tree.node_mut(node_id);
        node.record(value);
        current = node.parent();
    }
}
