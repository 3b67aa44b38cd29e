use crate::mcts::hyperparameters::SearchConfig;
use crate::services::planner::{PlanResult, PlanStatus};
use crate::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Full batch report written as JSON.
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub generated_at: String,
    pub version: &'static str,
    pub config: &'a SearchConfig,
    pub results: &'a [PlanResult],
}

impl<'a> BatchReport<'a> {
    pub fn new(config: &'a SearchConfig, results: &'a [PlanResult]) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            version: crate::VERSION,
            config,
            results,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    index: usize,
    target: &'a str,
    status: PlanStatus,
    routes: usize,
    shortest_route: Option<usize>,
    iterations: usize,
    nodes: usize,
    elapsed_secs: f64,
}

pub fn save_results_json(path: impl AsRef<Path>, report: &BatchReport<'_>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    log::info!("💾 Saved {} results to {}", report.results.len(), path.display());
    Ok(())
}

/// One CSV row per target.
pub fn save_summary_csv(path: impl AsRef<Path>, results: &[PlanResult]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(SummaryRow {
            index: result.index,
            target: result.target.as_str(),
            status: result.status,
            routes: result.routes.len(),
            shortest_route: result.route_lengths.iter().copied().min(),
            iterations: result.iterations,
            nodes: result.nodes,
            elapsed_secs: result.elapsed_secs,
        })?;
    }
    writer.flush()?;
    log::info!("💾 Saved summary to {}", path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
