use crate::chemistry::molecule::{ComponentSplitter, Molecule};
use crate::chemistry::rules::{ReactionApplier, RuleId};
use crate::chemistry::stock::AvailabilityFilter;
use crate::neural::ranker::RuleRanker;

/// Read-only collaborators a search consults while expanding nodes.
///
/// All four are shared across parallel searches; the search never mutates them.
#[derive(Clone, Copy)]
pub struct SearchEnvironment<'a> {
    pub ranker: &'a dyn RuleRanker,
    pub reactor: &'a dyn ReactionApplier,
    pub splitter: &'a dyn ComponentSplitter,
    pub stock: &'a dyn AvailabilityFilter,
}

impl<'a> SearchEnvironment<'a> {
    pub fn new(
        ranker: &'a dyn RuleRanker,
        reactor: &'a dyn ReactionApplier,
        splitter: &'a dyn ComponentSplitter,
        stock: &'a dyn AvailabilityFilter,
    ) -> Self {
        Self {
            ranker,
            reactor,
            splitter,
            stock,
        }
    }

    /// Apply `rule` to `molecule` and split the outcome into single molecules.
    ///
    /// Empty when the rule does not match.
    pub fn decompose(&self, molecule: &Molecule, rule: RuleId) -> Vec<Molecule> {
        let products = self.reactor.apply(molecule, rule);
        if products.is_empty() {
            return products;
        }
        self.splitter.split(&products)
    }
}
