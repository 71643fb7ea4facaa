//! Analysis configuration.

use std::fmt;
use std::str::FromStr;

/// How the test set is chosen once all independence pairs are known.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Strategy {
    /// Deterministic greedy cover only.
    Greedy,
    /// Greedy cover, refined by a bounded exact search when the condition count
    /// does not exceed [`AnalysisConfig::exact_threshold`].
    #[default]
    Exact,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Greedy => write!(f, "greedy"),
            Strategy::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Strategy::Greedy),
            "exact" => Ok(Strategy::Exact),
            other => Err(format!("unknown strategy '{}' (expected 'greedy' or 'exact')", other)),
        }
    }
}

/// Limits and knobs for a single analysis.
///
/// # Examples
///
/// ```
/// use mcdc_rs::config::{AnalysisConfig, Strategy};
///
/// let config = AnalysisConfig::default()
///     .with_max_conditions(12)
///     .with_strategy(Strategy::Greedy);
/// assert_eq!(config.max_conditions, 12);
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Largest accepted condition count. The table has `2^max_conditions` rows at most.
    pub max_conditions: usize,
    /// Selection strategy.
    pub strategy: Strategy,
    /// Exact search is only attempted for at most this many conditions.
    pub exact_threshold: usize,
    /// Maximum number of search nodes the exact search may visit.
    pub search_budget: u64,
}

impl AnalysisConfig {
    /// Hard ceiling for `max_conditions`: row indices must fit in `usize` on every target.
    pub const MAX_SUPPORTED_CONDITIONS: usize = 30;

    pub fn with_max_conditions(mut self, max_conditions: usize) -> Self {
        self.max_conditions = max_conditions.min(Self::MAX_SUPPORTED_CONDITIONS);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_exact_threshold(mut self, exact_threshold: usize) -> Self {
        self.exact_threshold = exact_threshold;
        self
    }

    pub fn with_search_budget(mut self, search_budget: u64) -> Self {
        self.search_budget = search_budget;
        self
    }

    /// Whether the exact search should run for `num_conditions` conditions.
    pub fn use_exact(&self, num_conditions: usize) -> bool {
        self.strategy == Strategy::Exact && num_conditions <= self.exact_threshold
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_conditions: 16,
            strategy: Strategy::default(),
            exact_threshold: 8,
            search_budget: 1_000_000,
        }
    }
}
