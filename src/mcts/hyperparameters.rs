//! Search hyperparameters and stop budgets.
//!
//! A configuration is validated once when a search is built; an invalid
//! budget fails fast instead of silently running a degenerate search.

use crate::mcts::evaluation::ValueEstimation;
use crate::{Result, RetroError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// MCTS hyperparameters configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    // ========== Selection ==========
    /// Exploration constant of the PUCT score.
    /// Default: 4.0
    pub c_puct: f64,

    /// Number of ranked rules requested from the oracle per expansion.
    /// Default: 100
    pub top_n: usize,

    // ========== Budgets ==========
    /// Maximum number of select/expand/backup iterations.
    /// Default: 10000
    pub step_count: usize,

    /// Leaves deeper than this are never expanded; also bounds rollouts.
    /// Default: 10
    pub depth_count: usize,

    /// Stop once this many terminal nodes exist.
    /// Default: 1000
    pub terminal_count: usize,

    /// Wall-clock ceiling in milliseconds, checked between iterations.
    /// Default: 360000 (6 minutes)
    pub time_budget_ms: u64,

    // ========== Evaluation ==========
    /// How the value of an expanded node is estimated.
    pub strategy: ValueEstimation,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            c_puct: 4.0,
            top_n: 100,
            step_count: 10_000,
            depth_count: 10,
            terminal_count: 1_000,
            time_budget_ms: 360_000,
            strategy: ValueEstimation::ConstantOptimistic,
        }
    }
}

impl SearchConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.c_puct.is_finite() || self.c_puct <= 0.0 {
            return Err(RetroError::Config(format!(
                "c_puct must be a positive finite number, got {}",
                self.c_puct
            )));
        }
        let budgets = [
            ("top_n", self.top_n as u64),
            ("step_count", self.step_count as u64),
            ("depth_count", self.depth_count as u64),
            ("terminal_count", self.terminal_count as u64),
            ("time_budget_ms", self.time_budget_ms),
        ];
        for (name, value) in budgets {
            if value == 0 {
                return Err(RetroError::Config(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }

    /// Create a configuration string for logging
    pub fn to_config_string(&self) -> String {
        format!(
            "c_puct[{:.2}]_top{}_steps[{}]_depth[{}]_terminals[{}]_time[{}ms]_{}",
            self.c_puct,
            self.top_n,
            self.step_count,
            self.depth_count,
            self.terminal_count,
            self.time_budget_ms,
            self.strategy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.c_puct, 4.0);
        assert_eq!(config.time_budget(), Duration::from_secs(360));
    }

    #[test]
    fn test_zero_budgets_rejected() {
        for config in [
            SearchConfig {
                terminal_count: 0,
                ..Default::default()
            },
            SearchConfig {
                depth_count: 0,
                ..Default::default()
            },
            SearchConfig {
                step_count: 0,
                ..Default::default()
            },
            SearchConfig {
                top_n: 0,
                ..Default::default()
            },
            SearchConfig {
                time_budget_ms: 0,
                ..Default::default()
            },
        ] {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, RetroError::Config(_)));
        }
    }

    #[test]
    fn test_invalid_c_puct_rejected() {
        let config = SearchConfig {
            c_puct: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = SearchConfig {
            c_puct: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"step_count": 50, "strategy": "greedy-rollout"}"#).unwrap();
        assert_eq!(config.step_count, 50);
        assert_eq!(config.depth_count, 10);
        assert_eq!(config.strategy, ValueEstimation::GreedyRollout);
    }

    #[test]
    fn test_config_string() {
        let config = SearchConfig::default().to_config_string();
        assert!(config.contains("c_puct[4.00]"));
        assert!(config.contains("depth[10]"));
        assert!(config.contains("constant-optimistic"));
    }
}
