//! Rule Ranking Oracle contract.
//!
//! A ranker turns a molecule into an ordered list of (rule, prior) pairs and,
//! for two-headed networks, a scalar state value. The search only depends on
//! this trait; descriptor computation and network inference stay behind it.

use crate::chemistry::molecule::Molecule;
use crate::chemistry::rules::{RuleId, RuleSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedRule {
    pub rule: RuleId,
    pub probability: f64,
}

/// Oracle output for one molecule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleRanking {
    /// Sorted by descending probability, at most `top_n` entries.
    pub candidates: Vec<RankedRule>,
    /// Value head output, when the oracle has one.
    pub value: Option<f64>,
}

impl RuleRanking {
    pub fn policy_only(candidates: Vec<RankedRule>) -> Self {
        Self {
            candidates,
            value: None,
        }
    }

    /// Leading candidates sharing the highest probability.
    pub fn best(&self) -> &[RankedRule] {
        let Some(first) = self.candidates.first() else {
            return &[];
        };
        let end = self
            .candidates
            .iter()
            .position(|candidate| candidate.probability < first.probability)
            .unwrap_or(self.candidates.len());
        &self.candidates[..end]
    }
}

/// Read-only predictor shared across parallel searches.
pub trait RuleRanker: Send + Sync {
    fn rank(&self, molecule: &Molecule, top_n: usize) -> RuleRanking;

    /// Whether [`RuleRanking::value`] is populated.
    fn has_value_head(&self) -> bool {
        false
    }
}

/// Argsort `scores` in descending order and keep the first `top_n`.
///
/// Ties keep ascending rule order; NaN scores are dropped.
pub fn top_candidates(scores: &[f32], top_n: usize) -> Vec<RankedRule> {
    let mut indices: Vec<usize> = (0..scores.len())
        .filter(|&idx| !scores[idx].is_nan())
        .collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    indices
        .into_iter()
        .take(top_n)
        .map(|idx| RankedRule {
            rule: RuleId(idx),
            probability: scores[idx] as f64,
        })
        .collect()
}

/// Ranks every rule by the prior stored in the rule set, independent of the molecule.
#[derive(Debug, Clone)]
pub struct StaticPriorRanker {
    priors: Vec<f32>,
}

impl StaticPriorRanker {
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            priors: rules.iter().map(|(_, rule)| rule.prior as f32).collect(),
        }
    }
}

impl RuleRanker for StaticPriorRanker {
    fn rank(&self, _molecule: &Molecule, top_n: usize) -> RuleRanking {
        RuleRanking::policy_only(top_candidates(&self.priors, top_n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::rules::Rule;

    #[test]
    fn test_top_candidates_sorted_and_truncated() {
        let ranked = top_candidates(&[0.1, 0.7, 0.3, 0.9], 3);
        let ids: Vec<usize> = ranked.iter().map(|r| r.rule.index()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!((ranked[0].probability - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_top_candidates_ties_keep_rule_order() {
        let ranked = top_candidates(&[0.5, 0.5, f32::NAN, 0.5], 10);
        let ids: Vec<usize> = ranked.iter().map(|r| r.rule.index()).collect();
        assert_eq!(ids, vec![0, 1, 3]);
    }

    #[test]
    fn test_best_returns_leading_ties() {
        let ranking = RuleRanking::policy_only(top_candidates(&[0.2, 1.0, 1.0, 0.4], 4));
        let best: Vec<usize> = ranking.best().iter().map(|r| r.rule.index()).collect();
        assert_eq!(best, vec![1, 2]);
        assert!(RuleRanking::default().best().is_empty());
    }

    #[test]
    fn test_static_prior_ranker() {
        let rules = RuleSet::new(vec![
            Rule::new("a").with_prior(0.2),
            Rule::new("b").with_prior(0.6),
        ]);
        let ranker = StaticPriorRanker::new(&rules);
        let ranking = ranker.rank(&Molecule::from("CCO"), 1);
        assert_eq!(ranking.candidates.len(), 1);
        assert_eq!(ranking.candidates[0].rule, RuleId(1));
        assert_eq!(ranking.value, None);
        assert!(!ranker.has_value_head());
    }
}
