//! Test set selection.
//!
//! Given the independence pairs of every condition, choose one pair per
//! condition so that the union of their rows is as small as possible.
//!
//! Selection proceeds in two stages:
//!
//! 1. **Feasibility.** Conditions without any pair cannot be demonstrated by
//!    this decision. They are reported in [`Status::Incomplete`] and the rest
//!    of the selection only considers the feasible conditions.
//! 2. **Cover.** A deterministic greedy cover is built first: repeatedly take
//!    the pair that covers the most uncovered conditions, preferring pairs
//!    that add fewer new rows, then the lexicographically smallest pair. For
//!    small condition counts an exact branch-and-bound search then looks for a
//!    strictly smaller selection.
//!
//! Pairs chosen for `k` conditions form a forest in the Boolean hypercube
//! (each edge flips a different bit, so no cycle can close), hence any
//! selection has at least `k + 1` rows. A selection of that size is optimal
//! and ends the search immediately.
//!
//! # Examples
//!
//! ```
//! use mcdc_rs::config::AnalysisConfig;
//! use mcdc_rs::pairs::find_pairs;
//! use mcdc_rs::select::select;
//! use mcdc_rs::table::TruthTable;
//!
//! let conditions = vec!["A".to_string(), "B".to_string()];
//! let table = TruthTable::from_decisions(conditions, vec![false, true, true, true]).unwrap();
//! let pairs = find_pairs(&table);
//! let selection = select(&pairs, table.len(), &AnalysisConfig::default());
//! assert!(selection.is_complete());
//! assert_eq!(selection.selected().iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::pairs::{IndependencePair, PairsByCondition};

/// Whether every condition could be covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Complete,
    /// Some conditions have no independence pair. The selection covers the others.
    Incomplete { uncoverable: Vec<String> },
}

/// Selected rows together with the pair justifying each covered condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    status: Status,
    selected: BTreeSet<usize>,
    coverage: BTreeMap<String, IndependencePair>,
    optimal: bool,
}

impl Selection {
    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }

    /// Conditions that cannot be covered, in condition order.
    pub fn uncoverable(&self) -> &[String] {
        match &self.status {
            Status::Complete => &[],
            Status::Incomplete { uncoverable } => uncoverable,
        }
    }

    /// Selected row indices, ascending.
    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Coverage map, keyed by condition name.
    pub fn coverage(&self) -> &BTreeMap<String, IndependencePair> {
        &self.coverage
    }

    /// Pair justifying the coverage of `condition`, if it is covered.
    pub fn pair_for(&self, condition: &str) -> Option<IndependencePair> {
        self.coverage.get(condition).copied()
    }

    /// Whether the selection is known to have the minimum possible size.
    pub fn is_optimal(&self) -> bool {
        self.optimal
    }
}

/// One chosen pair per condition position; `None` for uncovered conditions.
type Choice = Vec<Option<IndependencePair>>;

fn rows_of(choice: &Choice) -> BTreeSet<usize> {
    choice
        .iter()
        .flatten()
        .flat_map(|p| [p.first, p.second])
        .collect()
}

/// Selects a test set for the given pairs of a table with `table_size` rows.
///
/// # Panics
///
/// Panics if a pair references a row outside the table.
pub fn select(pairs: &PairsByCondition, table_size: usize, config: &AnalysisConfig) -> Selection {
    let n = pairs.num_conditions();

    let uncoverable = pairs.uncoverable_positions();
    let feasible: Vec<usize> = (0..n).filter(|&k| !pairs.at(k).is_empty()).collect();
    for &k in &feasible {
        for p in pairs.at(k) {
            assert!(
                p.second < table_size,
                "pair {} of condition {} is outside a table of {} rows",
                p,
                k,
                table_size
            );
        }
    }
    if !uncoverable.is_empty() {
        info!(
            "select: {} of {} conditions are uncoverable",
            uncoverable.len(),
            n
        );
    }

    let mut choice = greedy(pairs, &feasible, table_size);
    let greedy_size = rows_of(&choice).len();
    let lower_bound = if feasible.is_empty() {
        0
    } else {
        feasible.len() + 1
    };
    debug!(
        "select: greedy selection has {} rows (lower bound {})",
        greedy_size, lower_bound
    );

    let mut optimal = greedy_size <= lower_bound;
    if !optimal && config.use_exact(n) {
        let mut search = ExactSearch::new(pairs, &feasible, table_size, config.search_budget, &choice);
        search.run();
        if search.exhausted {
            warn!(
                "select: exact search stopped after {} nodes, keeping best selection of {} rows",
                search.nodes, search.best_size
            );
        } else {
            debug!(
                "select: exact search finished after {} nodes with {} rows",
                search.nodes, search.best_size
            );
        }
        optimal = !search.exhausted;
        choice = search.best;
    }

    let selected = rows_of(&choice);
    let names = pairs.conditions();
    let coverage = choice
        .iter()
        .enumerate()
        .filter_map(|(k, p)| p.map(|p| (names[k].clone(), p)))
        .collect();
    let status = if uncoverable.is_empty() {
        Status::Complete
    } else {
        Status::Incomplete {
            uncoverable: uncoverable.iter().map(|&k| names[k].clone()).collect(),
        }
    };

    Selection {
        status,
        selected,
        coverage,
        optimal,
    }
}

/// Greedy cover of the feasible conditions.
///
/// Each step takes the candidate row pair that covers the most uncovered
/// conditions. Ties go to the pair adding the fewest rows not yet selected,
/// then to the lexicographically smallest `(i, j)`. The row-count criterion
/// comes before the index order, so the result can differ from a purely
/// lexicographic tie-break: for `(A and B) or C` it reuses row 6 for `B`
/// instead of opening new rows.
fn greedy(pairs: &PairsByCondition, feasible: &[usize], table_size: usize) -> Choice {
    let mut choice: Choice = vec![None; pairs.num_conditions()];
    let mut in_selection = vec![false; table_size];

    // Candidate row pairs with the conditions each one witnesses.
    let mut candidates: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for &k in feasible {
        for p in pairs.at(k) {
            candidates.entry(p.indices()).or_default().push(k);
        }
    }

    let mut remaining = feasible.len();
    while remaining > 0 {
        // (rows, gain, cost); ascending iteration keeps the smallest key on ties.
        let mut best: Option<((usize, usize), usize, usize)> = None;
        for (&key, conditions) in &candidates {
            let gain = conditions.iter().filter(|&&k| choice[k].is_none()).count();
            if gain == 0 {
                continue;
            }
            let cost = usize::from(!in_selection[key.0]) + usize::from(!in_selection[key.1]);
            let better = match best {
                None => true,
                Some((_, best_gain, best_cost)) => {
                    gain > best_gain || (gain == best_gain && cost < best_cost)
                }
            };
            if better {
                best = Some((key, gain, cost));
            }
        }

        let Some((key, gain, cost)) = best else {
            break;
        };
        debug!(
            "greedy: take {:?} covering {} conditions with {} new rows",
            key, gain, cost
        );
        in_selection[key.0] = true;
        in_selection[key.1] = true;
        if let Some(conditions) = candidates.remove(&key) {
            for k in conditions {
                if choice[k].is_none() {
                    choice[k] = Some(IndependencePair::new(key.0, key.1, k));
                    remaining -= 1;
                }
            }
        }
    }

    choice
}

/// Branch-and-bound search for a minimum selection.
struct ExactSearch<'a> {
    pairs: &'a PairsByCondition,
    feasible: &'a [usize],
    lower_bound: usize,
    budget: u64,
    nodes: u64,
    exhausted: bool,
    /// How many chosen pairs use each row.
    refcount: Vec<u32>,
    union_size: usize,
    current: Choice,
    best: Choice,
    best_size: usize,
}

impl<'a> ExactSearch<'a> {
    fn new(
        pairs: &'a PairsByCondition,
        feasible: &'a [usize],
        table_size: usize,
        budget: u64,
        initial: &Choice,
    ) -> Self {
        Self {
            pairs,
            feasible,
            lower_bound: feasible.len() + 1,
            budget,
            nodes: 0,
            exhausted: false,
            refcount: vec![0; table_size],
            union_size: 0,
            current: vec![None; pairs.num_conditions()],
            best: initial.clone(),
            best_size: rows_of(initial).len(),
        }
    }

    fn run(&mut self) {
        self.search(0);
    }

    fn cost(&self, p: &IndependencePair) -> usize {
        usize::from(self.refcount[p.first] == 0) + usize::from(self.refcount[p.second] == 0)
    }

    fn push(&mut self, p: IndependencePair) {
        for i in [p.first, p.second] {
            if self.refcount[i] == 0 {
                self.union_size += 1;
            }
            self.refcount[i] += 1;
        }
        self.current[p.condition] = Some(p);
    }

    fn pop(&mut self, p: IndependencePair) {
        for i in [p.first, p.second] {
            self.refcount[i] -= 1;
            if self.refcount[i] == 0 {
                self.union_size -= 1;
            }
        }
        self.current[p.condition] = None;
    }

    fn search(&mut self, assigned: usize) {
        if self.exhausted || self.best_size <= self.lower_bound {
            return;
        }
        if self.nodes >= self.budget {
            self.exhausted = true;
            return;
        }
        self.nodes += 1;

        if assigned == self.feasible.len() {
            if self.union_size < self.best_size {
                debug!("exact: found selection of {} rows", self.union_size);
                self.best = self.current.clone();
                self.best_size = self.union_size;
            }
            return;
        }

        // A pair inside the current rows costs nothing and never hurts: take it without branching.
        // Otherwise branch on the open condition with the fewest pairs.
        let pairs = self.pairs;
        let mut branch: Option<(usize, usize)> = None;
        for &k in self.feasible {
            if self.current[k].is_some() {
                continue;
            }
            let list = pairs.at(k);
            if let Some(&p) = list.iter().find(|p| self.cost(p) == 0) {
                self.push(p);
                self.search(assigned + 1);
                self.pop(p);
                return;
            }
            if branch.map_or(true, |(_, len)| list.len() < len) {
                branch = Some((k, list.len()));
            }
        }

        // Every open condition needs at least one more row.
        if self.union_size + 1 >= self.best_size {
            return;
        }
        let Some((k, _)) = branch else {
            return;
        };

        let mut options: Vec<IndependencePair> = pairs.at(k).to_vec();
        options.sort_by_key(|p| (self.cost(p), p.first, p.second));
        for p in options {
            if self.union_size + self.cost(&p) >= self.best_size {
                break;
            }
            self.push(p);
            self.search(assigned + 1);
            self.pop(p);
            if self.exhausted {
                break;
            }
        }
    }
}
