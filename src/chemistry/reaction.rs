use crate::chemistry::molecule::Molecule;
use crate::chemistry::stock::AvailabilityFilter;
use serde::{Deserialize, Serialize};

/// A reverse-reaction step recorded on a search edge.
///
/// `reactants` holds the molecule that was decomposed and `products` the
/// single-component precursors the rule produced for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub products: Vec<Molecule>,
    pub reactants: Vec<Molecule>,
}

impl ReactionRecord {
    pub fn new(products: Vec<Molecule>, reactants: Vec<Molecule>) -> Self {
        Self {
            products,
            reactants,
        }
    }

    /// True when every product passes the availability filter.
    pub fn is_fully_available(&self, stock: &dyn AvailabilityFilter) -> bool {
        stock.filter(&self.products).is_empty()
    }
}
