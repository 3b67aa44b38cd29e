use crate::chemistry::molecule::Molecule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Index of a transformation rule inside its [`RuleSet`].
///
/// Policy networks emit one score per rule, so the index doubles as the
/// position of that rule's output neuron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub usize);

impl RuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reverse transformation rule in tabulated form.
///
/// `transforms` maps a reactant to every product set the rule yields for it.
/// A product set may hold several components joined by `.`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default)]
    pub prior: f64,
    #[serde(default)]
    pub transforms: HashMap<Molecule, Vec<Molecule>>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prior: 0.0,
            transforms: HashMap::new(),
        }
    }

    pub fn with_prior(mut self, prior: f64) -> Self {
        self.prior = prior;
        self
    }

    pub fn with_transform(
        mut self,
        reactant: impl Into<Molecule>,
        products: impl Into<Molecule>,
    ) -> Self {
        self.transforms
            .entry(reactant.into())
            .or_default()
            .push(products.into());
        self
    }
}

/// Ordered, indexable collection of rules; immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules.iter().enumerate().map(|(idx, rule)| (RuleId(idx), rule))
    }

    pub fn name(&self, id: RuleId) -> Option<&str> {
        self.get(id).map(|rule| rule.name.as_str())
    }
}

/// Applies a rule to a molecule.
///
/// An empty result means the rule does not match; it is never an error.
pub trait ReactionApplier: Send + Sync {
    fn apply(&self, molecule: &Molecule, rule: RuleId) -> Vec<Molecule>;
}

/// Reaction applier backed by a precomputed rule table.
#[derive(Debug, Clone, Default)]
pub struct TabulatedReactor {
    rules: RuleSet,
}

impl TabulatedReactor {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl ReactionApplier for TabulatedReactor {
    fn apply(&self, molecule: &Molecule, rule: RuleId) -> Vec<Molecule> {
        self.rules
            .get(rule)
            .and_then(|rule| rule.transforms.get(molecule))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reactor() -> TabulatedReactor {
        TabulatedReactor::new(RuleSet::new(vec![
            Rule::new("amide_coupling")
                .with_prior(0.8)
                .with_transform("CC(=O)NCC", "CC(=O)O.NCC"),
            Rule::new("esterification")
                .with_prior(0.3)
                .with_transform("CC(=O)OCC", "CC(=O)O.OCC")
                .with_transform("CC(=O)OCC", "CC(=O)Cl.OCC"),
        ]))
    }

    #[test]
    fn test_apply_matching_rule() {
        let products = reactor().apply(&Molecule::from("CC(=O)NCC"), RuleId(0));
        assert_eq!(products, vec![Molecule::from("CC(=O)O.NCC")]);
    }

    #[test]
    fn test_apply_returns_every_outcome() {
        let products = reactor().apply(&Molecule::from("CC(=O)OCC"), RuleId(1));
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_no_match_is_empty() {
        let reactor = reactor();
        assert!(reactor.apply(&Molecule::from("CCCC"), RuleId(0)).is_empty());
        assert!(reactor.apply(&Molecule::from("CC(=O)NCC"), RuleId(42)).is_empty());
    }

    #[test]
    fn test_rule_set_roundtrips_through_json() {
        let rules = reactor().rules().clone();
        let json = serde_json::to_string(&rules).unwrap();
        let restored: RuleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.name(RuleId(1)), Some("esterification"));
        assert_eq!(restored, rules);
    }
}
