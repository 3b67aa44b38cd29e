// main.rs - batch retrosynthesis planner
use clap::Parser;
use std::path::PathBuf;

use retrosynth::chemistry::{DotSplitter, HashedFingerprint, RuleSet, TabulatedReactor};
use retrosynth::data::{
    load_rule_set, load_search_config, load_stock, load_targets, save_results_json,
    save_summary_csv, BatchReport,
};
use retrosynth::logging::setup_logging;
use retrosynth::mcts::{SearchConfig, ValueEstimation};
use retrosynth::neural::{DensePolicyValueNet, RuleRanker, StaticPriorRanker};
use retrosynth::services::{PlanStatus, Planner, PlannerContext};
use retrosynth::RetroError;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyCli {
    /// Value head of a two-headed network (requires --model)
    NetworkTwoHead,
    /// Every expansion counts as solved
    ConstantOptimistic,
    /// Greedy decomposition rollout
    GreedyRollout,
}

impl From<StrategyCli> for ValueEstimation {
    fn from(cli: StrategyCli) -> Self {
        match cli {
            StrategyCli::NetworkTwoHead => ValueEstimation::NetworkTwoHead,
            StrategyCli::ConstantOptimistic => ValueEstimation::ConstantOptimistic,
            StrategyCli::GreedyRollout => ValueEstimation::GreedyRollout,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "retrosynth", about = "Plan retrosynthesis routes with policy-guided MCTS")]
struct Args {
    /// Target molecules, one per line
    #[arg(short = 't', long)]
    targets: PathBuf,

    /// Rule set (JSON array of rules)
    #[arg(short = 'r', long)]
    rules: PathBuf,

    /// Purchasable building blocks, one per line
    #[arg(long)]
    stock: PathBuf,

    /// Policy/value network checkpoint (safetensors); rule priors are used without it
    #[arg(short = 'm', long)]
    model: Option<PathBuf>,

    /// LibTorch VarStore checkpoint, used instead of --model
    #[cfg(feature = "torch")]
    #[arg(long, conflicts_with = "model")]
    torch_model: Option<PathBuf>,

    /// Hidden layer width of the --torch-model network
    #[cfg(feature = "torch")]
    #[arg(long, default_value_t = 512)]
    torch_hidden: i64,

    /// Value estimation strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyCli>,

    /// Maximum search iterations per target
    #[arg(short = 's', long)]
    steps: Option<usize>,

    /// Maximum expansion depth
    #[arg(short = 'd', long)]
    depth: Option<usize>,

    /// Stop after this many terminal nodes
    #[arg(long)]
    terminals: Option<usize>,

    /// Wall-clock budget per target, in milliseconds
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Ranked rules requested per expansion
    #[arg(long)]
    top_n: Option<usize>,

    /// PUCT exploration constant
    #[arg(long)]
    c_puct: Option<f64>,

    /// Base search configuration (JSON); flags above override it
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// JSON report path
    #[arg(short = 'o', long, default_value = "results.json")]
    output: PathBuf,

    /// Optional per-target CSV summary
    #[arg(long)]
    summary_csv: Option<PathBuf>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Also write rotating log files to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn search_config(&self) -> retrosynth::Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => load_search_config(path)?,
            None => SearchConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        if let Some(steps) = self.steps {
            config.step_count = steps;
        }
        if let Some(depth) = self.depth {
            config.depth_count = depth;
        }
        if let Some(terminals) = self.terminals {
            config.terminal_count = terminals;
        }
        if let Some(millis) = self.time_budget_ms {
            config.time_budget_ms = millis;
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(c_puct) = self.c_puct {
            config.c_puct = c_puct;
        }
        config.validate()?;
        Ok(config)
    }
}

fn build_ranker(
    args: &Args,
    config: &SearchConfig,
    rules: &RuleSet,
) -> retrosynth::Result<Box<dyn RuleRanker>> {
    #[cfg(feature = "torch")]
    {
        if let Some(path) = &args.torch_model {
            return Ok(Box::new(retrosynth::neural::TorchPolicyValueNet::load(
                path,
                HashedFingerprint::default(),
                args.torch_hidden,
                rules.len(),
                config.strategy.requires_value_head(),
            )?));
        }
    }
    #[cfg(not(feature = "torch"))]
    let _ = config;

    match &args.model {
        Some(path) => Ok(Box::new(DensePolicyValueNet::load(
            path,
            HashedFingerprint::default(),
            rules.len(),
        )?)),
        None => {
            log::info!("ℹ️ No model given, ranking rules by their priors");
            Ok(Box::new(StaticPriorRanker::new(rules)))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let _logger = setup_logging("info", args.log_dir.as_deref())?;

    let config = args.search_config()?;
    log::info!("🧪 retrosynth {} | {}", retrosynth::VERSION, config.to_config_string());

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| RetroError::Config(format!("cannot build thread pool: {e}")))?;
        log::info!("🧵 Using {} worker threads", threads);
    }

    let rules = load_rule_set(&args.rules)?;
    let stock = load_stock(&args.stock)?;
    let targets = load_targets(&args.targets)?;

    let ranker = build_ranker(&args, &config, &rules)?;

    let planner = Planner::new(PlannerContext {
        ranker,
        reactor: Box::new(TabulatedReactor::new(rules)),
        splitter: Box::new(DotSplitter),
        stock: Box::new(stock),
        config,
    })?;

    let results = planner.plan_batch(&targets)?;

    let solved = results
        .iter()
        .filter(|r| matches!(r.status, PlanStatus::Solved | PlanStatus::InStock))
        .count();
    log::info!("✅ {}/{} targets solved or in stock", solved, results.len());

    save_results_json(&args.output, &BatchReport::new(&planner.context().config, &results))?;
    if let Some(path) = &args.summary_csv {
        save_summary_csv(path, &results)?;
    }
    Ok(())
}
