//! Batch route planning over many targets.
//!
//! Loaded artifacts live in one [`PlannerContext`] shared read-only by every
//! worker; each target gets its own [`RetroSearch`] and tree.

use crate::chemistry::molecule::{ComponentSplitter, Molecule};
use crate::chemistry::rules::ReactionApplier;
use crate::chemistry::stock::AvailabilityFilter;
use crate::mcts::algorithm::RetroSearch;
use crate::mcts::environment::SearchEnvironment;
use crate::mcts::hyperparameters::SearchConfig;
use crate::mcts::mcts_result::Route;
use crate::neural::ranker::RuleRanker;
use crate::{Result, RetroError};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Immutable artifacts loaded once at startup.
pub struct PlannerContext {
    pub ranker: Box<dyn RuleRanker>,
    pub reactor: Box<dyn ReactionApplier>,
    pub splitter: Box<dyn ComponentSplitter>,
    pub stock: Box<dyn AvailabilityFilter>,
    pub config: SearchConfig,
}

impl PlannerContext {
    pub fn environment(&self) -> SearchEnvironment<'_> {
        SearchEnvironment::new(
            self.ranker.as_ref(),
            self.reactor.as_ref(),
            self.splitter.as_ref(),
            self.stock.as_ref(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// The target is purchasable; no search was run.
    InStock,
    /// At least one route ends in available materials.
    Solved,
    /// Terminal states were reached but every deepest route left an unresolved product.
    Incomplete,
    /// No terminal state within budget.
    Unsolved,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub index: usize,
    pub target: Molecule,
    pub status: PlanStatus,
    pub routes: Vec<Route>,
    pub route_lengths: Vec<usize>,
    pub iterations: usize,
    pub nodes: usize,
    pub elapsed_secs: f64,
}

#[derive(Clone)]
pub struct Planner {
    context: Arc<PlannerContext>,
}

impl Planner {
    pub fn new(context: PlannerContext) -> Result<Self> {
        context.config.validate()?;
        if context.config.strategy.requires_value_head() && !context.ranker.has_value_head() {
            return Err(RetroError::Config(format!(
                "value estimation '{}' needs a two-headed network checkpoint",
                context.config.strategy
            )));
        }
        log::info!("🔧 Planner configured: {}", context.config.to_config_string());
        Ok(Self {
            context: Arc::new(context),
        })
    }

    pub fn context(&self) -> &PlannerContext {
        &self.context
    }

    /// Plan one target; `index` is its position in the input batch.
    pub fn plan(&self, index: usize, target: &Molecule) -> Result<PlanResult> {
        let start = Instant::now();
        let context = &self.context;

        if context.stock.is_available(target) {
            log::info!("{} target {} is in stock", index + 1, target);
            return Ok(PlanResult {
                index,
                target: target.clone(),
                status: PlanStatus::InStock,
                routes: Vec::new(),
                route_lengths: Vec::new(),
                iterations: 0,
                nodes: 0,
                elapsed_secs: start.elapsed().as_secs_f64(),
            });
        }

        let mut search =
            RetroSearch::new(target.clone(), context.config.clone(), context.environment())?;
        let outcome = search.find();

        let route_lengths = outcome.route_lengths();
        let (status, routes) = match outcome.routes {
            None => (PlanStatus::Unsolved, Vec::new()),
            Some(routes) if routes.is_empty() => (PlanStatus::Incomplete, routes),
            Some(routes) => (PlanStatus::Solved, routes),
        };

        let elapsed_secs = start.elapsed().as_secs_f64();
        log::info!(
            "{} target {} done: {:?}, {} routes, {} iterations, {:.2}s",
            index + 1,
            target,
            status,
            routes.len(),
            outcome.iterations,
            elapsed_secs
        );

        Ok(PlanResult {
            index,
            target: target.clone(),
            status,
            routes,
            route_lengths,
            iterations: outcome.iterations,
            nodes: outcome.stats.nodes,
            elapsed_secs,
        })
    }

    /// Plan every target in parallel; results keep input order.
    pub fn plan_batch(&self, targets: &[Molecule]) -> Result<Vec<PlanResult>> {
        log::info!("🚀 Planning {} targets", targets.len());
        targets
            .par_iter()
            .enumerate()
            .map(|(index, target)| self.plan(index, target))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::molecule::DotSplitter;
    use crate::chemistry::rules::{Rule, RuleSet, TabulatedReactor};
    use crate::chemistry::stock::Stock;
    use crate::mcts::evaluation::ValueEstimation;
    use crate::neural::ranker::StaticPriorRanker;
    use assert_matches::assert_matches;

    fn context(config: SearchConfig) -> PlannerContext {
        let rules = RuleSet::new(vec![
            Rule::new("amide")
                .with_prior(0.8)
                .with_transform("CC(=O)NCC", "CC(=O)O.NCC"),
            Rule::new("ester")
                .with_prior(0.4)
                .with_transform("CC(=O)OC", "CC(=O)O.CO"),
        ]);
        PlannerContext {
            ranker: Box::new(StaticPriorRanker::new(&rules)),
            reactor: Box::new(TabulatedReactor::new(rules)),
            splitter: Box::new(DotSplitter),
            stock: Box::new(Stock::from_iter(["CC(=O)O", "NCC", "CO"].map(Molecule::from))),
            config,
        }
    }

    fn planner() -> Planner {
        Planner::new(context(SearchConfig {
            step_count: 30,
            ..Default::default()
        }))
        .unwrap()
    }

    #[test]
    fn test_in_stock_target_short_circuits() {
        let result = planner().plan(0, &Molecule::from("NCC")).unwrap();
        assert_eq!(result.status, PlanStatus::InStock);
        assert_eq!(result.iterations, 0);
        assert!(result.routes.is_empty());
    }

    #[test]
    fn test_solved_target() {
        let result = planner().plan(3, &Molecule::from("CC(=O)NCC")).unwrap();
        assert_matches!(result.status, PlanStatus::Solved);
        assert_eq!(result.index, 3);
        assert_eq!(result.route_lengths, vec![1]);
        assert!(result.iterations > 0);
    }

    #[test]
    fn test_unsolvable_target() {
        let result = planner().plan(0, &Molecule::from("c1ccccc1")).unwrap();
        assert_matches!(result.status, PlanStatus::Unsolved);
        assert_eq!(result.iterations, 30);
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let targets: Vec<Molecule> = ["CC(=O)OC", "CO", "c1ccccc1", "CC(=O)NCC"]
            .into_iter()
            .map(Molecule::from)
            .collect();
        let results = planner().plan_batch(&targets).unwrap();

        let statuses: Vec<PlanStatus> = results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                PlanStatus::Solved,
                PlanStatus::InStock,
                PlanStatus::Unsolved,
                PlanStatus::Solved
            ]
        );
        for (index, result) in results.iter().enumerate() {
            assert_eq!(result.index, index);
            assert_eq!(result.target, targets[index]);
        }
    }

    #[test]
    fn test_two_head_strategy_needs_value_head() {
        let config = SearchConfig {
            strategy: ValueEstimation::NetworkTwoHead,
            ..Default::default()
        };
        assert!(matches!(Planner::new(context(config)), Err(RetroError::Config(_))));
    }
}
