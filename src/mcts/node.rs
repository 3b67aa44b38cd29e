//! Arena-resident node and edge records of the search tree.
//!
//! Nodes refer to each other through [`NodeId`] indices into the owning
//! [`SearchTree`](crate::mcts::tree::SearchTree); no node aliases another
//! node's pending queue.

use crate::chemistry::molecule::Molecule;
use crate::chemistry::reaction::ReactionRecord;
use crate::chemistry::rules::RuleId;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Stable index of a node inside its tree. The root is always `NodeId::ROOT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Parent → child link, created once during expansion and never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEdge {
    pub parent: NodeId,
    pub rule: RuleId,
    pub reaction: ReactionRecord,
}

/// A partially solved synthesis state.
#[derive(Debug, Clone, Serialize)]
pub struct SearchNode {
    /// Distance from the root.
    pub depth: usize,

    /// Molecules still to decompose; the front is expanded next.
    pub pending: VecDeque<Molecule>,

    /// Number of times a backup passed through this node (N).
    pub visit_count: u32,

    /// Sum of all values backed up through this node (W).
    pub total_action: f64,

    /// Prior assigned by the parent's expansion (P); 1 at the root.
    pub prior_probability: f64,

    /// Incoming edge; `None` only at the root.
    pub edge: Option<SearchEdge>,

    pub children: Vec<NodeId>,
}

impl SearchNode {
    pub fn root(pending: impl IntoIterator<Item = Molecule>) -> Self {
        Self {
            depth: 0,
            pending: pending.into_iter().collect(),
            visit_count: 0,
            total_action: 0.0,
            prior_probability: 1.0,
            edge: None,
            children: Vec::new(),
        }
    }

    pub fn child(
        depth: usize,
        pending: VecDeque<Molecule>,
        prior_probability: f64,
        edge: SearchEdge,
    ) -> Self {
        Self {
            depth,
            pending,
            visit_count: 0,
            total_action: 0.0,
            prior_probability,
            edge: Some(edge),
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.edge.as_ref().map(|edge| edge.parent)
    }

    pub fn is_root(&self) -> bool {
        self.edge.is_none()
    }

    /// A non-root node with nothing left to decompose.
    pub fn is_terminal(&self) -> bool {
        !self.is_root() && self.pending.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Q = W / N, or 0 when the node was never visited.
    pub fn mean_action(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_action / self.visit_count as f64
        }
    }

    /// Accumulate one backed-up value.
    pub fn record(&mut self, value: f64) {
        self.visit_count += 1;
        self.total_action += value;
    }
}
