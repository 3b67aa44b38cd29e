//! # Retrosynthesis Route Planning Library
//!
//! Plans multi-step retrosynthesis routes: a target molecule is reduced, one
//! reverse reaction at a time, to commercially available starting materials.
//!
//! ## Features
//!
//! - **Search Engine**: Monte Carlo Tree Search with PUCT selection guided by a rule-ranking policy
//! - **Value Estimation**: two-headed network value, constant optimistic value, or greedy rollout
//! - **Chemistry Seams**: traits for rule application, component splitting and stock lookup
//! - **Batch Planning**: independent targets planned in parallel over shared read-only artifacts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use retrosynth::{
//!     chemistry::{DotSplitter, Molecule, TabulatedReactor},
//!     data::{load_rule_set, load_stock},
//!     mcts::SearchConfig,
//!     neural::StaticPriorRanker,
//!     services::{Planner, PlannerContext},
//! };
//!
//! # fn main() -> retrosynth::Result<()> {
//! let rules = load_rule_set("rules.json")?;
//! let planner = Planner::new(PlannerContext {
//!     ranker: Box::new(StaticPriorRanker::new(&rules)),
//!     reactor: Box::new(TabulatedReactor::new(rules)),
//!     splitter: Box::new(DotSplitter),
//!     stock: Box::new(load_stock("stock.smi")?),
//!     config: SearchConfig::default(),
//! })?;
//! let result = planner.plan(0, &Molecule::from("CC(=O)Nc1ccc(O)cc1"))?;
//! println!("{:?}: {} routes", result.status, result.routes.len());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Molecules, reactions, rules and stock
pub mod chemistry;

/// Monte Carlo Tree Search engine
pub mod mcts;

/// Rule ranking oracle and policy/value networks
pub mod neural;

/// Batch route planning
pub mod services;

/// Rule set, stock and target loading; result export
pub mod data;

/// Logger initialisation for binaries
pub mod logging;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use chemistry::{Molecule, ReactionRecord, RuleId};
pub use mcts::{RetroSearch, SearchConfig, SearchOutcome, ValueEstimation};
pub use services::{PlanResult, PlanStatus, Planner, PlannerContext};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the retrosynthesis library
#[derive(Debug, thiserror::Error)]
pub enum RetroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Checkpoint error: {0}")]
    SafeTensors(#[from] safetensors::SafeTensorError),

    #[error("Logging error: {0}")]
    Logging(#[from] flexi_logger::FlexiLoggerError),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RetroError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
