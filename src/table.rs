//! Truth table of a decision.
//!
//! Rows are stored in canonical order: the assignment of row `i` is the
//! binary expansion of `i`, with the first condition as the most significant
//! bit. Only the decision column is stored; condition values are recomputed
//! from the row index.

use std::collections::HashSet;

use log::{debug, info};

use crate::ast::Decision;
use crate::config::AnalysisConfig;
use crate::error::{Error, TableError};

/// Bit of row indices that holds the value of condition `position` among `num_conditions`.
#[inline]
pub fn condition_mask(num_conditions: usize, position: usize) -> usize {
    debug_assert!(position < num_conditions);
    1 << (num_conditions - 1 - position)
}

/// Assignment encoded by row `index`.
pub fn assignment(index: usize, num_conditions: usize) -> Vec<bool> {
    (0..num_conditions)
        .map(|k| index & condition_mask(num_conditions, k) != 0)
        .collect()
}

/// Row index encoding the given assignment.
pub fn encode(values: &[bool]) -> usize {
    values.iter().fold(0, |acc, &v| (acc << 1) | v as usize)
}

/// Checks that a table over `num_conditions` conditions fits in the configured limits.
pub fn check_capacity(num_conditions: usize, config: &AnalysisConfig) -> Result<(), Error> {
    let max = config
        .max_conditions
        .min(AnalysisConfig::MAX_SUPPORTED_CONDITIONS);
    if num_conditions > max {
        return Err(Error::CapacityExceeded {
            conditions: num_conditions,
            max,
        });
    }
    Ok(())
}

/// A single row of a [`TruthTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    pub values: Vec<bool>,
    pub decision: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    conditions: Vec<String>,
    decisions: Vec<bool>,
}

impl TruthTable {
    /// Enumerates all `2^N` assignments and evaluates the decision on each.
    ///
    /// The condition count is checked against the configuration before anything
    /// is enumerated.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcdc_rs::config::AnalysisConfig;
    /// use mcdc_rs::parser::parse;
    /// use mcdc_rs::table::TruthTable;
    ///
    /// let decision = parse("A or B").unwrap();
    /// let table = TruthTable::generate(&decision, &AnalysisConfig::default()).unwrap();
    /// assert_eq!(table.len(), 4);
    /// assert_eq!(table.decisions(), [false, true, true, true]);
    /// ```
    pub fn generate(decision: &Decision, config: &AnalysisConfig) -> Result<Self, Error> {
        let n = decision.num_conditions();
        check_capacity(n, config)?;

        let size = 1usize << n;
        info!("generating truth table: {} conditions, {} rows", n, size);
        let decisions = (0..size)
            .map(|i| decision.evaluate(&assignment(i, n)))
            .collect();

        Ok(Self {
            conditions: decision.conditions().to_vec(),
            decisions,
        })
    }

    /// Builds a table from the decision column of canonically ordered rows.
    pub fn from_decisions(conditions: Vec<String>, decisions: Vec<bool>) -> Result<Self, TableError> {
        check_conditions(&conditions)?;
        let expected = expected_rows(conditions.len());
        if decisions.len() != expected {
            return Err(TableError::RowCount {
                conditions: conditions.len(),
                expected,
                actual: decisions.len(),
            });
        }
        Ok(Self {
            conditions,
            decisions,
        })
    }

    /// Builds a table from externally produced rows of `(condition values, decision)`.
    ///
    /// Every row must carry one value per condition and rows must appear in
    /// canonical order, so that each combination is present exactly once.
    pub fn from_rows(
        conditions: Vec<String>,
        rows: impl IntoIterator<Item = (Vec<bool>, bool)>,
    ) -> Result<Self, TableError> {
        check_conditions(&conditions)?;
        let n = conditions.len();

        let rows: Vec<(Vec<bool>, bool)> = rows.into_iter().collect();
        let expected = expected_rows(n);
        if rows.len() != expected {
            return Err(TableError::RowCount {
                conditions: n,
                expected,
                actual: rows.len(),
            });
        }

        let mut decisions = Vec::with_capacity(rows.len());
        for (i, (values, decision)) in rows.into_iter().enumerate() {
            if values.len() != n {
                return Err(TableError::RowWidth {
                    row: i,
                    expected: n,
                    actual: values.len(),
                });
            }
            let encoded = encode(&values);
            if encoded != i {
                return Err(TableError::NonCanonical { row: i, encoded });
            }
            decisions.push(decision);
        }
        debug!("from_rows: {} rows for {} conditions", decisions.len(), n);

        Self::from_decisions(conditions, decisions)
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn num_conditions(&self) -> usize {
        self.conditions.len()
    }

    /// Number of rows, always `2^N`.
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn decisions(&self) -> &[bool] {
        &self.decisions
    }

    pub fn decision(&self, index: usize) -> bool {
        self.decisions[index]
    }

    /// Value of condition `position` in row `index`.
    pub fn value(&self, index: usize, position: usize) -> bool {
        index & condition_mask(self.num_conditions(), position) != 0
    }

    /// Position of the named condition in the condition list.
    pub fn position(&self, condition: &str) -> Option<usize> {
        self.conditions.iter().position(|c| c == condition)
    }

    pub fn row(&self, index: usize) -> Row {
        Row {
            index,
            values: assignment(index, self.num_conditions()),
            decision: self.decisions[index],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }
}

fn check_conditions(conditions: &[String]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for name in conditions {
        if !seen.insert(name.as_str()) {
            return Err(TableError::DuplicateCondition(name.clone()));
        }
    }
    Ok(())
}

fn expected_rows(num_conditions: usize) -> usize {
    u32::try_from(num_conditions)
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::parser::parse;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_order() {
        // First condition is the most significant bit.
        assert_eq!(assignment(0b10, 2), vec![true, false]);
        assert_eq!(assignment(0b01, 2), vec![false, true]);
        assert_eq!(encode(&[true, false, true]), 0b101);
        for i in 0..16 {
            assert_eq!(encode(&assignment(i, 4)), i);
        }
    }

    #[test]
    fn test_generate_or() {
        let decision = parse("A or B").unwrap();
        let table = TruthTable::generate(&decision, &AnalysisConfig::default()).unwrap();
        let rows: Vec<Row> = table.rows().collect();
        assert_eq!(
            rows,
            vec![
                Row { index: 0, values: vec![false, false], decision: false },
                Row { index: 1, values: vec![false, true], decision: true },
                Row { index: 2, values: vec![true, false], decision: true },
                Row { index: 3, values: vec![true, true], decision: true },
            ]
        );
        assert!(table.value(2, 0));
        assert!(!table.value(2, 1));
        assert_eq!(table.position("B"), Some(1));
        assert_eq!(table.position("C"), None);
    }

    #[test]
    fn test_capacity_checked_first() {
        let decision = parse("A and B and C and D").unwrap();
        let config = AnalysisConfig::default().with_max_conditions(3);
        assert_eq!(
            TruthTable::generate(&decision, &config),
            Err(Error::CapacityExceeded { conditions: 4, max: 3 })
        );
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![
            (vec![false, false], false),
            (vec![false, true], true),
            (vec![true, false], true),
            (vec![true, true], true),
        ];
        let table = TruthTable::from_rows(names(&["A", "B"]), rows).unwrap();
        assert_eq!(table.decisions(), [false, true, true, true]);
    }

    #[test]
    fn test_from_rows_malformed() {
        let too_many = vec![(vec![false], false), (vec![true], true), (vec![true], true)];
        assert_eq!(
            TruthTable::from_rows(names(&["A"]), too_many),
            Err(TableError::RowCount { conditions: 1, expected: 2, actual: 3 })
        );

        let swapped = vec![(vec![true], true), (vec![false], false)];
        assert_eq!(
            TruthTable::from_rows(names(&["A"]), swapped),
            Err(TableError::NonCanonical { row: 0, encoded: 1 })
        );

        let too_few = vec![(vec![false, false], false), (vec![false, true], true)];
        assert_eq!(
            TruthTable::from_rows(names(&["A", "B"]), too_few),
            Err(TableError::RowCount { conditions: 2, expected: 4, actual: 2 })
        );

        let narrow = vec![
            (vec![false, false], false),
            (vec![false], true),
            (vec![true, false], true),
            (vec![true, true], true),
        ];
        assert_eq!(
            TruthTable::from_rows(names(&["A", "B"]), narrow),
            Err(TableError::RowWidth { row: 1, expected: 2, actual: 1 })
        );

        assert_eq!(
            TruthTable::from_decisions(names(&["A", "A"]), vec![false; 4]),
            Err(TableError::DuplicateCondition("A".to_string()))
        );
    }
}
