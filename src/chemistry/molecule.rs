use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between disconnected components of a multi-fragment molecule.
pub const COMPONENT_SEPARATOR: char = '.';

/// Opaque molecule identifier (a SMILES-like string).
///
/// Equality is textual: two identifiers name the same molecule only if the
/// external chemistry layer produced them in the same canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Molecule(String);

impl Molecule {
    pub fn new(smiles: impl Into<String>) -> Self {
        Self(smiles.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier holds more than one disconnected component.
    pub fn is_multi_component(&self) -> bool {
        self.0.contains(COMPONENT_SEPARATOR)
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Molecule {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Molecule {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Decomposes multi-component products into single molecules.
pub trait ComponentSplitter: Send + Sync {
    fn split(&self, products: &[Molecule]) -> Vec<Molecule>;
}

/// Splits at the SMILES component separator, dropping empty fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotSplitter;

impl ComponentSplitter for DotSplitter {
    fn split(&self, products: &[Molecule]) -> Vec<Molecule> {
        products
            .iter()
            .flat_map(|product| product.as_str().split(COMPONENT_SEPARATOR))
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(Molecule::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_multi_component_products() {
        let products = vec![Molecule::from("CC(=O)O.NCC"), Molecule::from("O")];
        let split = DotSplitter.split(&products);
        assert_eq!(
            split,
            vec![Molecule::from("CC(=O)O"), Molecule::from("NCC"), Molecule::from("O")]
        );
    }

    #[test]
    fn test_split_drops_empty_fragments() {
        let split = DotSplitter.split(&[Molecule::from("C..N.")]);
        assert_eq!(split, vec![Molecule::from("C"), Molecule::from("N")]);
    }

    #[test]
    fn test_multi_component_detection() {
        assert!(Molecule::from("C.N").is_multi_component());
        assert!(!Molecule::from("CCO").is_multi_component());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Molecule::from("CCO")).unwrap();
        assert_eq!(json, "\"CCO\"");
    }
}
