use crate::chemistry::molecule::Molecule;
use crate::chemistry::reaction::ReactionRecord;
use crate::chemistry::stock::AvailabilityFilter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ordered reaction sequence from the target down to starting materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    pub reactions: Vec<ReactionRecord>,
}

impl Route {
    pub fn new(reactions: Vec<ReactionRecord>) -> Self {
        Self { reactions }
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn last(&self) -> Option<&ReactionRecord> {
        self.reactions.last()
    }

    /// Available products over all steps, in route order, without duplicates.
    pub fn starting_materials(&self, stock: &dyn AvailabilityFilter) -> Vec<Molecule> {
        let mut materials: Vec<Molecule> = Vec::new();
        for product in self.reactions.iter().flat_map(|r| r.products.iter()) {
            if stock.is_available(product) && !materials.contains(product) {
                materials.push(product.clone());
            }
        }
        materials
    }
}

/// Size and timing figures of one finished search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SearchStats {
    pub iterations: usize,
    pub nodes: usize,
    pub edges: usize,
    pub terminal_nodes: usize,
    pub max_depth: usize,
    pub elapsed: Duration,
}

/// Result of [`RetroSearch::find`](crate::mcts::algorithm::RetroSearch::find).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// `None` when no terminal node was reached; otherwise the accepted
    /// deepest routes, possibly empty if none passed the final availability check.
    pub routes: Option<Vec<Route>>,
    pub iterations: usize,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn is_solved(&self) -> bool {
        self.routes.as_ref().is_some_and(|routes| !routes.is_empty())
    }

    pub fn route_lengths(&self) -> Vec<usize> {
        self.routes
            .as_ref()
            .map(|routes| routes.iter().map(Route::len).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::stock::Stock;

    #[test]
    fn test_starting_materials() {
        let stock = Stock::from_iter(["s1", "s2"].map(Molecule::from));
        let route = Route::new(vec![
            ReactionRecord::new(
                vec![Molecule::from("A"), Molecule::from("s1")],
                vec![Molecule::from("T")],
            ),
            ReactionRecord::new(
                vec![Molecule::from("s2"), Molecule::from("s1")],
                vec![Molecule::from("A")],
            ),
        ]);
        assert_eq!(route.len(), 2);
        assert_eq!(
            route.starting_materials(&stock),
            vec![Molecule::from("s1"), Molecule::from("s2")]
        );
    }

    #[test]
    fn test_outcome_solved_flags() {
        let unsolved = SearchOutcome {
            routes: None,
            iterations: 5,
            stats: SearchStats::default(),
        };
        assert!(!unsolved.is_solved());
        assert!(unsolved.route_lengths().is_empty());

        let rejected = SearchOutcome {
            routes: Some(Vec::new()),
            ..unsolved.clone()
        };
        assert!(!rejected.is_solved());
    }
}
