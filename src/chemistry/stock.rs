use crate::chemistry::molecule::Molecule;
use std::collections::HashSet;

/// Partitions molecules into "needs further synthesis" and "obtainable".
pub trait AvailabilityFilter: Send + Sync {
    /// Returns the molecules that still require synthesis, in input order.
    fn filter(&self, molecules: &[Molecule]) -> Vec<Molecule>;

    fn is_available(&self, molecule: &Molecule) -> bool {
        self.filter(std::slice::from_ref(molecule)).is_empty()
    }
}

/// In-memory set of purchasable building blocks.
#[derive(Debug, Clone, Default)]
pub struct Stock {
    molecules: HashSet<Molecule>,
}

impl Stock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, molecule: Molecule) -> bool {
        self.molecules.insert(molecule)
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    pub fn contains(&self, molecule: &Molecule) -> bool {
        self.molecules.contains(molecule)
    }
}

impl FromIterator<Molecule> for Stock {
    fn from_iter<I: IntoIterator<Item = Molecule>>(iter: I) -> Self {
        Self {
            molecules: iter.into_iter().collect(),
        }
    }
}

impl AvailabilityFilter for Stock {
    fn filter(&self, molecules: &[Molecule]) -> Vec<Molecule> {
        molecules
            .iter()
            .filter(|molecule| !self.molecules.contains(*molecule))
            .cloned()
            .collect()
    }

    fn is_available(&self, molecule: &Molecule) -> bool {
        self.molecules.contains(molecule)
    }
}
