//! # mcdc-rs: MCDC test obligations for boolean decisions
//!
//! **`mcdc-rs`** computes **Modified Condition/Decision Coverage** (MCDC) test sets
//! for a boolean decision over a small number of conditions.
//!
//! ## What is MCDC?
//!
//! MCDC requires, for every condition of a decision, a pair of test cases that
//! differ only in that condition and produce different decision outcomes.
//! Such a pair demonstrates that the condition *independently* affects the decision.
//! The goal is to find a small set of test cases (truth-table rows) that contains
//! such a pair for every condition.
//!
//! ## Basic Usage
//!
//! ```rust
//! use mcdc_rs::analysis::Analysis;
//! use mcdc_rs::config::AnalysisConfig;
//!
//! let analysis = Analysis::run("(A and B) or C", &AnalysisConfig::default()).unwrap();
//!
//! let selection = analysis.selection();
//! assert!(selection.is_complete());
//! assert_eq!(selection.len(), 4); // N + 1 rows for N = 3 conditions
//!
//! for (condition, pair) in selection.coverage() {
//!     println!("{} is shown by rows {}", condition, pair);
//! }
//! ```
//!
//! ## Core Components
//!
//! - **[`parser`]**: Safe expression parser producing a typed [`Decision`][crate::ast::Decision].
//! - **[`table`]**: The [`TruthTable`][crate::table::TruthTable] in canonical row order
//!   (first condition is the most significant bit).
//! - **[`pairs`]**: Discovery of all independence pairs per condition.
//! - **[`select`]**: Greedy and exact selection of a minimal covering test set.
//! - **[`render`]**: Plain-text rendering of tables, pairs and selections.
//!
//! A condition that has no independence pair (for example, one that is masked by the rest
//! of the decision) is not an error: the selection is reported as
//! [`Status::Incomplete`][crate::select::Status::Incomplete] and lists such conditions.

pub mod analysis;
pub mod ast;
pub mod config;
pub mod error;
pub mod pairs;
pub mod parser;
pub mod render;
pub mod select;
pub mod table;

pub use error::{Error, Result};
