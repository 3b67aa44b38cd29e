use crate::chemistry::molecule::Molecule;
use crate::chemistry::reaction::ReactionRecord;
use crate::chemistry::rules::RuleId;
use crate::mcts::node::{NodeId, SearchEdge, SearchNode};
use std::collections::VecDeque;

/// Out-tree of search nodes stored in an arena.
///
/// Nodes are appended by expansion and never removed, so a [`NodeId`] stays
/// valid for the lifetime of the tree.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Tree with a single root holding `pending`.
    pub fn new(pending: impl IntoIterator<Item = Molecule>) -> Self {
        Self {
            nodes: vec![SearchNode::root(pending)],
        }
    }

    pub fn root(&self) -> &SearchNode {
        &self.nodes[NodeId::ROOT.0]
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every non-root node owns exactly one incoming edge.
    pub fn edge_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Attach a new child below `parent` and return its id.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        rule: RuleId,
        reaction: ReactionRecord,
        pending: VecDeque<Molecule>,
        prior_probability: f64,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.node(parent).depth + 1;
        let edge = SearchEdge {
            parent,
            rule,
            reaction,
        };
        self.nodes
            .push(SearchNode::child(depth, pending, prior_probability, edge));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Non-root nodes whose pending queue is empty, in creation order.
    pub fn terminal_nodes(&self) -> Vec<NodeId> {
        self.ids().filter(|&id| self.node(id).is_terminal()).collect()
    }

    /// Node ids from the root down to `id`, both inclusive.
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent() {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Reactions along the root → `id` path, target first.
    pub fn reactions(&self, id: NodeId) -> Vec<ReactionRecord> {
        self.path(id)
            .into_iter()
            .filter_map(|node| self.node(node).edge.as_ref())
            .map(|edge| edge.reaction.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction(reactant: &str, products: &[&str]) -> ReactionRecord {
        ReactionRecord::new(
            products.iter().map(|p| Molecule::from(*p)).collect(),
            vec![Molecule::from(reactant)],
        )
    }

    fn chain() -> (SearchTree, NodeId, NodeId) {
        let mut tree = SearchTree::new([Molecule::from("T")]);
        let a = tree.add_child(
            NodeId::ROOT,
            RuleId(0),
            reaction("T", &["A", "s1"]),
            VecDeque::from([Molecule::from("A")]),
            0.6,
        );
        let b = tree.add_child(a, RuleId(1), reaction("A", &["s2"]), VecDeque::new(), 0.9);
        (tree, a, b)
    }

    #[test]
    fn test_child_depth_and_links() {
        let (tree, a, b) = chain();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.edge_count(), 2);
        assert_eq!(tree.node(a).depth, 1);
        assert_eq!(tree.node(b).depth, 2);
        assert_eq!(tree.node(b).parent(), Some(a));
        assert_eq!(tree.children(NodeId::ROOT), &[a]);
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_depth_invariant_holds_for_every_node() {
        let (tree, _, _) = chain();
        for id in tree.ids() {
            if let Some(parent) = tree.node(id).parent() {
                assert_eq!(tree.node(id).depth, tree.node(parent).depth + 1);
            }
        }
    }

    #[test]
    fn test_terminal_nodes_exclude_root() {
        let mut tree = SearchTree::new(Vec::new());
        assert!(tree.terminal_nodes().is_empty());

        let child = tree.add_child(
            NodeId::ROOT,
            RuleId(0),
            reaction("T", &["s"]),
            VecDeque::new(),
            1.0,
        );
        assert_eq!(tree.terminal_nodes(), vec![child]);
    }

    #[test]
    fn test_path_and_reactions() {
        let (tree, a, b) = chain();
        assert_eq!(tree.path(b), vec![NodeId::ROOT, a, b]);
        assert_eq!(tree.path(NodeId::ROOT), vec![NodeId::ROOT]);

        let reactions = tree.reactions(b);
        assert_eq!(reactions.len(), 2);
        assert_eq!(reactions[0].reactants, vec![Molecule::from("T")]);
        assert_eq!(reactions[1].products, vec![Molecule::from("s2")]);
    }
}
