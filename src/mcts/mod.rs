pub mod algorithm;
pub mod environment;
pub mod evaluation;
pub mod hyperparameters;
pub mod mcts_result;
pub mod node;
pub mod selection;
pub mod tree;

pub use algorithm::RetroSearch;
pub use environment::SearchEnvironment;
pub use evaluation::{greedy_rollout, ValueEstimation, SOLVED_REWARD, UNSOLVED_REWARD};
pub use hyperparameters::SearchConfig;
pub use mcts_result::{Route, SearchOutcome, SearchStats};
pub use node::{NodeId, SearchEdge, SearchNode};
pub use tree::SearchTree;
