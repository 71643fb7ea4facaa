//! Error types.
//!
//! Only malformed inputs and capacity violations are errors. A condition that
//! cannot be independently demonstrated is reported through
//! [`Status::Incomplete`][crate::select::Status::Incomplete] instead.

use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error of the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The expression could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The truth table does not satisfy its structural contract.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The table for this many conditions is too large to enumerate.
    #[error("{conditions} conditions exceed the configured limit of {max} (table would have 2^{conditions} rows)")]
    CapacityExceeded { conditions: usize, max: usize },
}

/// Syntax errors in a decision expression.
///
/// Positions are byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unclosed parenthesis opened at position {position}")]
    UnclosedParen { position: usize },

    #[error("expression nested too deeply at position {position}")]
    TooDeep { position: usize },

    #[error("no conditions found in the expression")]
    NoConditions,
}

/// Contract violations of an externally produced truth table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("duplicate condition name '{0}'")]
    DuplicateCondition(String),

    #[error("expected {expected} rows for {conditions} conditions, got {actual}")]
    RowCount {
        conditions: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} condition values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} is out of canonical order (its assignment encodes index {encoded})")]
    NonCanonical { row: usize, encoded: usize },
}
