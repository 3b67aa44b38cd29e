//! Policy-guided Monte Carlo Tree Search over retrosynthesis states.
//!
//! One [`RetroSearch`] owns one tree for one target. Each iteration selects a
//! leaf by PUCT, expands it with the oracle's ranked rules, estimates its
//! value with the configured [`ValueEstimation`] and backs that value up to
//! the root. [`RetroSearch::find`] then turns the deepest terminal paths into
//! reaction routes.
use crate::chemistry::molecule::Molecule;
use crate::chemistry::reaction::ReactionRecord;
use crate::mcts::environment::SearchEnvironment;
use crate::mcts::evaluation::{ValueEstimation, SOLVED_REWARD};
use crate::mcts::hyperparameters::SearchConfig;
use crate::mcts::mcts_result::{Route, SearchOutcome, SearchStats};
use crate::mcts::node::NodeId;
use crate::mcts::selection::{backpropagate, select_leaf};
use crate::mcts::tree::SearchTree;
use crate::{Result, RetroError};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

pub struct RetroSearch<'a> {
    target: Molecule,
    tree: SearchTree,
    config: SearchConfig,
    env: SearchEnvironment<'a>,
    terminal_nodes: BTreeSet<NodeId>,
}

impl<'a> RetroSearch<'a> {
    /// Build a search whose root holds `target` as its only pending molecule.
    pub fn new(target: Molecule, config: SearchConfig, env: SearchEnvironment<'a>) -> Result<Self> {
        config.validate()?;
        if config.strategy.requires_value_head() && !env.ranker.has_value_head() {
            return Err(RetroError::Config(format!(
                "value estimation '{}' needs a ranker with a value head",
                config.strategy
            )));
        }

        Ok(Self {
            tree: SearchTree::new([target.clone()]),
            target,
            config,
            env,
            terminal_nodes: BTreeSet::new(),
        })
    }

    pub fn target(&self) -> &Molecule {
        &self.target
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn strategy(&self) -> ValueEstimation {
        self.config.strategy
    }

    /// Terminal nodes found so far, in creation order.
    pub fn terminal_nodes(&self) -> Vec<NodeId> {
        self.terminal_nodes.iter().copied().collect()
    }

    /// Leaf reached by PUCT descent from the root.
    pub fn select(&self) -> NodeId {
        select_leaf(&self.tree, self.config.c_puct)
    }

    /// Pop the front molecule of `id`, attach one child per applicable ranked
    /// rule and return the node's estimated value.
    ///
    /// The pop is permanent. A node with nothing pending is worth the solved
    /// reward and is left untouched.
    pub fn expand_and_evaluate(&mut self, id: NodeId) -> f64 {
        let Some(molecule) = self.tree.node_mut(id).pending.pop_front() else {
            return SOLVED_REWARD;
        };
        if self.tree.node(id).is_terminal() {
            self.terminal_nodes.insert(id);
        }

        let ranking = self.env.ranker.rank(&molecule, self.config.top_n);
        let depth = self.tree.node(id).depth;
        let value = self.config.strategy.estimate(
            &self.env,
            &ranking,
            &molecule,
            depth,
            self.config.depth_count,
            self.config.top_n,
        );

        let mut created = 0usize;
        for candidate in &ranking.candidates {
            let products = self.env.decompose(&molecule, candidate.rule);
            if products.is_empty() {
                continue;
            }

            let mut pending = self.tree.node(id).pending.clone();
            for residue in self.env.stock.filter(&products) {
                if !pending.contains(&residue) {
                    pending.push_back(residue);
                }
            }

            let solved = pending.is_empty();
            let reaction = ReactionRecord::new(products, vec![molecule.clone()]);
            let child = self
                .tree
                .add_child(id, candidate.rule, reaction, pending, candidate.probability);
            if solved {
                self.terminal_nodes.insert(child);
            }
            created += 1;
        }

        log::trace!(
            "Expanded {} at depth {} ({}): {}/{} rules applied, value {:.3}",
            id,
            depth,
            molecule,
            created,
            ranking.candidates.len(),
            value
        );
        value
    }

    /// Propagate `value` from `id` up to and including the root.
    pub fn backup(&mut self, id: NodeId, value: f64) {
        backpropagate(&mut self.tree, id, value);
    }

    /// Run iterations until a budget is spent; returns the iterations performed.
    ///
    /// Leaves deeper than `depth_count` are skipped without expansion or backup.
    /// The terminal-count and time budgets are checked after every iteration,
    /// so an overrun is at most one iteration long.
    pub fn emulate(&mut self) -> usize {
        let start = Instant::now();
        let time_budget = self.config.time_budget();
        let mut iterations = 0;

        while iterations < self.config.step_count {
            iterations += 1;

            let leaf = self.select();
            if self.tree.node(leaf).depth > self.config.depth_count {
                log::trace!("Skipping {} beyond depth budget", leaf);
            } else {
                let value = self.expand_and_evaluate(leaf);
                self.backup(leaf, value);
            }

            if self.terminal_nodes.len() >= self.config.terminal_count {
                log::debug!(
                    "Terminal budget reached after {} iterations ({} terminal nodes)",
                    iterations,
                    self.terminal_nodes.len()
                );
                break;
            }
            if start.elapsed() > time_budget {
                log::warn!(
                    "⏱️ Time budget of {:?} exhausted after {} iterations for {}",
                    time_budget,
                    iterations,
                    self.target
                );
                break;
            }
        }

        iterations
    }

    /// Run the search and extract the deepest routes ending in available materials.
    pub fn find(&mut self) -> SearchOutcome {
        let start = Instant::now();
        let iterations = self.emulate();
        let stats = self.stats(iterations, start.elapsed());
        log::debug!(
            "Search for {} finished: {} iterations, {} nodes, {} terminal, depth {}",
            self.target,
            stats.iterations,
            stats.nodes,
            stats.terminal_nodes,
            stats.max_depth
        );

        if self.terminal_nodes.is_empty() {
            return SearchOutcome {
                routes: None,
                iterations,
                stats,
            };
        }

        let deepest = self
            .terminal_nodes
            .iter()
            .map(|&id| self.tree.node(id).depth)
            .max()
            .unwrap_or(0);

        let routes: Vec<Route> = self
            .terminal_nodes
            .iter()
            .filter(|&&id| self.tree.node(id).depth == deepest)
            .map(|&id| self.tree.reactions(id))
            .filter(|reactions| {
                reactions
                    .last()
                    .is_some_and(|last| last.is_fully_available(self.env.stock))
            })
            .map(Route::new)
            .collect();

        SearchOutcome {
            routes: Some(routes),
            iterations,
            stats,
        }
    }

    pub fn stats(&self, iterations: usize, elapsed: Duration) -> SearchStats {
        SearchStats {
            iterations,
            nodes: self.tree.len(),
            edges: self.tree.edge_count(),
            terminal_nodes: self.terminal_nodes.len(),
            max_depth: self.tree.max_depth(),
            elapsed,
        }
    }
}
