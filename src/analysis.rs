//! End-to-end MCDC analysis of a single decision.
//!
//! The pipeline is strictly linear:
//!
//! ```text
//! expression -> Decision -> TruthTable -> PairsByCondition -> Selection
//! ```
//!
//! Every stage produces a fresh value; nothing is shared between analyses.

use log::info;

use crate::ast::Decision;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::pairs::{find_pairs, PairsByCondition};
use crate::parser::parse;
use crate::select::{select, Selection};
use crate::table::{check_capacity, TruthTable};

/// All artifacts of one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    decision: Option<Decision>,
    table: TruthTable,
    pairs: PairsByCondition,
    selection: Selection,
}

impl Analysis {
    /// Parses `expression` and runs the full analysis.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcdc_rs::analysis::Analysis;
    /// use mcdc_rs::config::AnalysisConfig;
    ///
    /// let analysis = Analysis::run("A or B", &AnalysisConfig::default()).unwrap();
    /// assert!(analysis.selection().is_complete());
    /// assert_eq!(analysis.selection().len(), 3);
    /// ```
    pub fn run(expression: &str, config: &AnalysisConfig) -> Result<Self> {
        let decision = parse(expression)?;
        info!(
            "analyzing '{}' over {} conditions",
            decision,
            decision.num_conditions()
        );
        let table = TruthTable::generate(&decision, config)?;
        let mut analysis = Self::from_table(table, config)?;
        analysis.decision = Some(decision);
        Ok(analysis)
    }

    /// Runs pair discovery and selection on an externally produced table.
    pub fn from_table(table: TruthTable, config: &AnalysisConfig) -> Result<Self> {
        check_capacity(table.num_conditions(), config)?;

        let pairs = find_pairs(&table);
        info!(
            "found {} independence pairs, {} conditions uncoverable",
            pairs.total(),
            pairs.uncoverable_positions().len()
        );
        let selection = select(&pairs, table.len(), config);
        info!(
            "selected {} of {} rows ({})",
            selection.len(),
            table.len(),
            if selection.is_complete() {
                "complete"
            } else {
                "incomplete"
            }
        );

        Ok(Self {
            decision: None,
            table,
            pairs,
            selection,
        })
    }

    /// The parsed decision, if the analysis started from an expression.
    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub fn conditions(&self) -> &[String] {
        self.table.conditions()
    }

    pub fn table(&self) -> &TruthTable {
        &self.table
    }

    pub fn pairs(&self) -> &PairsByCondition {
        &self.pairs
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::error::{Error, ParseError};

    #[test]
    fn test_run_or() {
        let analysis = Analysis::run("A or B", &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.conditions(), ["A", "B"]);
        assert_eq!(analysis.decision().unwrap().to_string(), "A or B");
        let selection = analysis.selection();
        assert!(selection.is_complete());
        assert_eq!(selection.pair_for("A").map(|p| p.indices()), Some((0, 2)));
        assert_eq!(selection.pair_for("B").map(|p| p.indices()), Some((0, 1)));
    }

    #[test]
    fn test_run_parse_error() {
        assert_eq!(
            Analysis::run("A and", &AnalysisConfig::default()),
            Err(Error::Parse(ParseError::UnexpectedEnd))
        );
    }

    #[test]
    fn test_run_capacity() {
        let config = AnalysisConfig::default().with_max_conditions(2);
        assert_eq!(
            Analysis::run("A or B or C", &config),
            Err(Error::CapacityExceeded { conditions: 3, max: 2 })
        );
    }

    #[test]
    fn test_from_table_capacity() {
        let names = (0..3).map(|k| format!("c{}", k)).collect();
        let table = TruthTable::from_decisions(names, vec![false; 8]).unwrap();
        let config = AnalysisConfig::default().with_max_conditions(2);
        assert!(matches!(
            Analysis::from_table(table, &config),
            Err(Error::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let config = AnalysisConfig::default();
        let expr = "(Reset or (M1 and M2)) and not Deactivate";
        let first = Analysis::run(expr, &config).unwrap();
        let second = Analysis::run(expr, &config).unwrap();
        assert_eq!(first, second);
        assert!(first.selection().is_complete());
        assert_eq!(first.selection().len(), 5);
    }
}
