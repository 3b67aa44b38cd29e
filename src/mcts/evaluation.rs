//! Value estimation strategies for freshly expanded nodes.

use crate::chemistry::molecule::Molecule;
use crate::mcts::environment::SearchEnvironment;
use crate::neural::ranker::RuleRanking;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Reward for a fully decomposed state.
pub const SOLVED_REWARD: f64 = 1.0;

/// Reward for a rollout that ran out of budget.
pub const UNSOLVED_REWARD: f64 = 0.0;

/// Chosen once per search; never switched mid-search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueEstimation {
    /// Use the value head of a two-headed network.
    NetworkTwoHead,
    /// Every expansion is worth the solved reward.
    ConstantOptimistic,
    /// Single deterministic greedy decomposition down to the depth budget.
    GreedyRollout,
}

impl ValueEstimation {
    pub fn requires_value_head(self) -> bool {
        matches!(self, ValueEstimation::NetworkTwoHead)
    }

    /// Value of the node at `depth` whose front molecule `molecule` was just expanded.
    pub fn estimate(
        self,
        env: &SearchEnvironment<'_>,
        ranking: &RuleRanking,
        molecule: &Molecule,
        depth: usize,
        depth_count: usize,
        top_n: usize,
    ) -> f64 {
        match self {
            ValueEstimation::NetworkTwoHead => ranking.value.unwrap_or_else(|| {
                log::warn!("Ranker returned no value for {}, assuming solved", molecule);
                SOLVED_REWARD
            }),
            ValueEstimation::ConstantOptimistic => SOLVED_REWARD,
            ValueEstimation::GreedyRollout => {
                greedy_rollout(env, molecule, depth_count.saturating_sub(depth), top_n)
            }
        }
    }
}

impl fmt::Display for ValueEstimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueEstimation::NetworkTwoHead => "network-two-head",
            ValueEstimation::ConstantOptimistic => "constant-optimistic",
            ValueEstimation::GreedyRollout => "greedy-rollout",
        };
        f.write_str(name)
    }
}

/// Greedy decomposition of `molecule` for at most `budget` steps.
///
/// Each step pops the front molecule and applies the first of its
/// highest-ranked rules that yields products; unavailable products are queued.
/// A molecule none of its top rules can decompose is dropped from the queue.
/// Returns the solved reward when the queue empties within budget, otherwise
/// the unsolved reward.
pub fn greedy_rollout(
    env: &SearchEnvironment<'_>,
    molecule: &Molecule,
    budget: usize,
    top_n: usize,
) -> f64 {
    let mut queue = VecDeque::from([molecule.clone()]);

    for _ in 0..budget {
        let Some(reactant) = queue.pop_front() else {
            return SOLVED_REWARD;
        };

        let ranking = env.ranker.rank(&reactant, top_n);
        let products = ranking
            .best()
            .iter()
            .map(|candidate| env.decompose(&reactant, candidate.rule))
            .find(|products| !products.is_empty());

        match products {
            Some(products) => queue.extend(env.stock.filter(&products)),
            None => log::trace!("Rollout dropped {}: no top rule applies", reactant),
        }

        if queue.is_empty() {
            return SOLVED_REWARD;
        }
    }

    UNSOLVED_REWARD
}
