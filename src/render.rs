//! Plain-text rendering of analysis results.
//!
//! # Examples
//!
//! ```
//! use mcdc_rs::analysis::Analysis;
//! use mcdc_rs::config::AnalysisConfig;
//! use mcdc_rs::render::{RenderConfig, TableDisplay};
//!
//! let analysis = Analysis::run("A and B", &AnalysisConfig::default()).unwrap();
//! let text = TableDisplay::new(analysis.table(), &RenderConfig::default())
//!     .with_selection(analysis.selection())
//!     .to_string();
//! assert!(text.starts_with("Index  A      B      Decision"));
//! ```

use std::fmt;

use crate::pairs::PairsByCondition;
use crate::select::Selection;
use crate::table::TruthTable;

/// Formatting options.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Render booleans as `1`/`0` instead of `True`/`False`.
    pub numeric: bool,
    /// Marker appended to selected rows.
    pub marker: &'static str,
    /// Extra spaces after each column.
    pub padding: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            numeric: false,
            marker: " *",
            padding: 2,
        }
    }
}

impl RenderConfig {
    fn bool_str(&self, value: bool) -> &'static str {
        match (self.numeric, value) {
            (true, true) => "1",
            (true, false) => "0",
            (false, true) => "True",
            (false, false) => "False",
        }
    }
}

/// Truth table with optional highlighting of selected rows.
pub struct TableDisplay<'a> {
    table: &'a TruthTable,
    config: &'a RenderConfig,
    selection: Option<&'a Selection>,
}

impl<'a> TableDisplay<'a> {
    pub fn new(table: &'a TruthTable, config: &'a RenderConfig) -> Self {
        Self {
            table,
            config,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: &'a Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    fn widths(&self) -> Vec<usize> {
        let value_width = self.config.bool_str(false).len();
        let index_width = "Index".len().max((self.table.len().max(1) - 1).to_string().len());
        std::iter::once(index_width)
            .chain(self.table.conditions().iter().map(|c| c.len().max(value_width)))
            .chain(std::iter::once("Decision".len().max(value_width)))
            .map(|w| w + self.config.padding)
            .collect()
    }
}

impl fmt::Display for TableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let total: usize = widths.iter().sum();

        let header = std::iter::once("Index")
            .chain(self.table.conditions().iter().map(|c| c.as_str()))
            .chain(std::iter::once("Decision"));
        for (cell, width) in header.zip(&widths) {
            write!(f, "{:<width$}", cell, width = *width)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(total))?;

        for row in self.table.rows() {
            let index = row.index.to_string();
            let cells = std::iter::once(index.as_str())
                .chain(row.values.iter().map(|&v| self.config.bool_str(v)))
                .chain(std::iter::once(self.config.bool_str(row.decision)));
            for (cell, width) in cells.zip(&widths) {
                write!(f, "{:<width$}", cell, width = *width)?;
            }
            if self.selection.map_or(false, |s| s.contains(row.index)) {
                write!(f, "{}", self.config.marker)?;
            }
            writeln!(f)?;
        }

        if let Some(selection) = self.selection.filter(|s| !s.is_empty()) {
            let indices: Vec<usize> = selection.selected().iter().copied().collect();
            writeln!(f)?;
            writeln!(f, "Selected Row Indices for MCDC: {:?}", indices)?;
        }
        Ok(())
    }
}

/// Per-condition listing of independence pairs.
pub struct PairsDisplay<'a> {
    pairs: &'a PairsByCondition,
}

impl<'a> PairsDisplay<'a> {
    pub fn new(pairs: &'a PairsByCondition) -> Self {
        Self { pairs }
    }
}

impl fmt::Display for PairsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (condition, pairs) in self.pairs.iter() {
            if pairs.is_empty() {
                writeln!(f, "  Condition '{}': --- No independence pairs found ---", condition)?;
            } else {
                let list: Vec<String> = pairs.iter().map(|p| p.to_string()).collect();
                writeln!(f, "  Condition '{}': [{}]", condition, list.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Selected test set and coverage map, or the infeasibility report.
pub struct SelectionDisplay<'a> {
    selection: &'a Selection,
}

impl<'a> SelectionDisplay<'a> {
    pub fn new(selection: &'a Selection) -> Self {
        Self { selection }
    }
}

impl fmt::Display for SelectionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selection = self.selection;
        let indices: Vec<usize> = selection.selected().iter().copied().collect();

        if !selection.is_complete() {
            writeln!(
                f,
                "MCDC cannot be achieved for conditions: {:?}",
                selection.uncoverable()
            )?;
            if !indices.is_empty() {
                writeln!(f, "Partial set covering some conditions: {:?}", indices)?;
            }
            return Ok(());
        }

        writeln!(
            f,
            "Selected Test Set Indices ({} tests): {:?}{}",
            indices.len(),
            indices,
            if selection.is_optimal() { "" } else { " (not proven minimal)" }
        )?;
        writeln!(f, "Coverage Map (Condition: Covering Pair Indices):")?;
        for (condition, pair) in selection.coverage() {
            writeln!(f, "  '{}': {}", condition, pair)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::analysis::Analysis;
    use crate::config::AnalysisConfig;

    #[test]
    fn test_table_display() {
        let analysis = Analysis::run("A or B", &AnalysisConfig::default()).unwrap();
        let config = RenderConfig::default();
        let text = TableDisplay::new(analysis.table(), &config)
            .with_selection(analysis.selection())
            .to_string();
        let row = |cells: [&str; 4]| {
            format!("{:<7}{:<7}{:<7}{:<10}", cells[0], cells[1], cells[2], cells[3])
        };
        let expected = vec![
            row(["Index", "A", "B", "Decision"]),
            "-".repeat(31),
            row(["0", "False", "False", "False"]) + " *",
            row(["1", "False", "True", "True"]) + " *",
            row(["2", "True", "False", "True"]) + " *",
            row(["3", "True", "True", "True"]),
            String::new(),
            "Selected Row Indices for MCDC: [0, 1, 2]".to_string(),
        ];
        assert_eq!(text.lines().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_table_display_numeric() {
        let analysis = Analysis::run("A and B", &AnalysisConfig::default()).unwrap();
        let config = RenderConfig {
            numeric: true,
            ..RenderConfig::default()
        };
        let text = TableDisplay::new(analysis.table(), &config).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[5].trim_end(), "3      1  1  1");
    }

    #[test]
    fn test_pairs_display() {
        let analysis = Analysis::run("A and (B or not B)", &AnalysisConfig::default()).unwrap();
        let text = PairsDisplay::new(analysis.pairs()).to_string();
        assert_eq!(
            text,
            "  Condition 'A': [(0, 2), (1, 3)]\n  Condition 'B': --- No independence pairs found ---\n"
        );
    }

    #[test]
    fn test_selection_display() {
        let analysis = Analysis::run("A or B", &AnalysisConfig::default()).unwrap();
        let text = SelectionDisplay::new(analysis.selection()).to_string();
        assert_eq!(
            text,
            "Selected Test Set Indices (3 tests): [0, 1, 2]\n\
             Coverage Map (Condition: Covering Pair Indices):\n  'A': (0, 2)\n  'B': (0, 1)\n"
        );

        let analysis = Analysis::run("A and (B or not B)", &AnalysisConfig::default()).unwrap();
        let text = SelectionDisplay::new(analysis.selection()).to_string();
        assert_eq!(
            text,
            "MCDC cannot be achieved for conditions: [\"B\"]\nPartial set covering some conditions: [0, 2]\n"
        );
    }
}
