//! Chemistry-facing domain types and the collaborator seams the search consumes.
//!
//! The search core never inspects a molecule: it only moves [`Molecule`]
//! identifiers between the reaction applier, the component splitter and the
//! availability filter. Concrete table-driven implementations live alongside
//! the traits so the planner can run without an external reaction engine.

pub mod fingerprint;
pub mod molecule;
pub mod reaction;
pub mod rules;
pub mod stock;

pub use fingerprint::HashedFingerprint;
pub use molecule::{ComponentSplitter, DotSplitter, Molecule};
pub use reaction::ReactionRecord;
pub use rules::{ReactionApplier, Rule, RuleId, RuleSet, TabulatedReactor};
pub use stock::{AvailabilityFilter, Stock};
