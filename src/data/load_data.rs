use crate::chemistry::molecule::Molecule;
use crate::chemistry::rules::RuleSet;
use crate::chemistry::stock::Stock;
use crate::mcts::hyperparameters::SearchConfig;
use crate::{Result, RetroError};
use std::fs;
use std::path::Path;

/// Load an ordered rule set from a JSON array of rules.
pub fn load_rule_set(path: impl AsRef<Path>) -> Result<RuleSet> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| artifact_error(path, e))?;
    let rules: RuleSet = serde_json::from_str(&raw)?;
    if rules.is_empty() {
        return Err(RetroError::Artifact(format!(
            "rule set {} contains no rules",
            path.display()
        )));
    }
    log::info!("📂 Loaded {} rules from {}", rules.len(), path.display());
    Ok(rules)
}

/// Load purchasable building blocks, one molecule per line.
pub fn load_stock(path: impl AsRef<Path>) -> Result<Stock> {
    let path = path.as_ref();
    let stock: Stock = read_molecules(path)?.into_iter().collect();
    log::info!("📂 Loaded {} stock molecules from {}", stock.len(), path.display());
    Ok(stock)
}

/// Load target molecules in file order, one per line.
pub fn load_targets(path: impl AsRef<Path>) -> Result<Vec<Molecule>> {
    let path = path.as_ref();
    let targets = read_molecules(path)?;
    log::info!("📂 Loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}

/// Load a search configuration; absent fields keep their defaults.
pub fn load_search_config(path: impl AsRef<Path>) -> Result<SearchConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| artifact_error(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Blank lines and `#` comments are skipped; only the first whitespace-separated
/// field of a line is kept, so `SMILES name` files load as-is.
fn read_molecules(path: &Path) -> Result<Vec<Molecule>> {
    let raw = fs::read_to_string(path).map_err(|e| artifact_error(path, e))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .map(Molecule::from)
        .collect())
}

fn artifact_error(path: &Path, err: std::io::Error) -> RetroError {
    RetroError::Artifact(format!("cannot read {}: {}", path.display(), err))
}
