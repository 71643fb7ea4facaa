//! Independence pairs.
//!
//! For a condition at position `k`, every row `i` with bit `k` clear has a
//! unique partner `i | mask(k)` that differs from it in that condition only.
//! The pair witnesses the condition's independent effect iff the two decisions
//! differ. Scanning each row once per condition finds all pairs in
//! `O(2^N * N)` without comparing arbitrary rows.
//!
//! # Examples
//!
//! ```
//! use mcdc_rs::pairs::find_pairs;
//! use mcdc_rs::table::TruthTable;
//!
//! let conditions = vec!["A".to_string(), "B".to_string()];
//! // A or B
//! let table = TruthTable::from_decisions(conditions, vec![false, true, true, true]).unwrap();
//! let pairs = find_pairs(&table);
//! assert_eq!(pairs.get("A").unwrap()[0].indices(), (0, 2));
//! assert_eq!(pairs.get("B").unwrap()[0].indices(), (0, 1));
//! ```

use std::fmt;

use log::debug;

use crate::table::{condition_mask, TruthTable};

/// Two rows that differ in exactly one condition and in the decision.
///
/// Always normalized so that `first < second`. Ordering is lexicographic on
/// `(first, second)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct IndependencePair {
    pub first: usize,
    pub second: usize,
    /// Position of the witnessed condition.
    pub condition: usize,
}

impl IndependencePair {
    pub fn new(a: usize, b: usize, condition: usize) -> Self {
        assert_ne!(a, b, "pair rows must be distinct");
        Self {
            first: a.min(b),
            second: a.max(b),
            condition,
        }
    }

    pub fn indices(&self) -> (usize, usize) {
        (self.first, self.second)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.first == index || self.second == index
    }
}

impl fmt::Display for IndependencePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// All independence pairs of a table, grouped by condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairsByCondition {
    conditions: Vec<String>,
    pairs: Vec<Vec<IndependencePair>>,
}

impl PairsByCondition {
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn num_conditions(&self) -> usize {
        self.conditions.len()
    }

    /// Pairs of the condition at `position`, in ascending order.
    pub fn at(&self, position: usize) -> &[IndependencePair] {
        &self.pairs[position]
    }

    /// Pairs of the named condition, or `None` if there is no such condition.
    pub fn get(&self, condition: &str) -> Option<&[IndependencePair]> {
        let position = self.conditions.iter().position(|c| c == condition)?;
        Some(self.at(position))
    }

    /// Iterates `(condition, pairs)` in condition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[IndependencePair])> + '_ {
        self.conditions
            .iter()
            .zip(self.pairs.iter())
            .map(|(name, pairs)| (name.as_str(), pairs.as_slice()))
    }

    /// Positions of conditions without any pair.
    pub fn uncoverable_positions(&self) -> Vec<usize> {
        (0..self.num_conditions())
            .filter(|&k| self.pairs[k].is_empty())
            .collect()
    }

    /// Names of conditions without any pair.
    pub fn uncoverable(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, pairs)| pairs.is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Whether every condition has at least one pair.
    pub fn is_coverable(&self) -> bool {
        self.pairs.iter().all(|pairs| !pairs.is_empty())
    }

    /// Total number of pairs over all conditions.
    pub fn total(&self) -> usize {
        self.pairs.iter().map(|pairs| pairs.len()).sum()
    }
}

/// Finds every independence pair of every condition.
pub fn find_pairs(table: &TruthTable) -> PairsByCondition {
    let n = table.num_conditions();
    let decisions = table.decisions();

    let pairs: Vec<Vec<IndependencePair>> = (0..n)
        .map(|k| {
            let mask = condition_mask(n, k);
            let found: Vec<IndependencePair> = (0..decisions.len())
                .filter(|&i| i & mask == 0)
                .filter(|&i| decisions[i] != decisions[i | mask])
                .map(|i| IndependencePair::new(i, i | mask, k))
                .collect();
            debug!(
                "find_pairs: condition {} ({}) has {} pairs",
                k,
                table.conditions()[k],
                found.len()
            );
            found
        })
        .collect();

    PairsByCondition {
        conditions: table.conditions().to_vec(),
        pairs,
    }
}
