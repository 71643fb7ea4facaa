//! Typed syntax tree of a decision.
//!
//! Conditions are referenced by their position in the decision's condition
//! list, which is also their bit position in the truth table (position 0 is
//! the most significant bit).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Const(bool),
    Var(usize),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn constant(value: bool) -> Self {
        Expr::Const(value)
    }

    pub fn var(position: usize) -> Self {
        Expr::Var(position)
    }

    pub fn not(value: Self) -> Self {
        match value {
            Expr::Not(inner) => *inner,
            _ => Expr::Not(Box::new(value)),
        }
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        Expr::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        Expr::Or(Box::new(lhs), Box::new(rhs))
    }

    /// Evaluates the expression for an assignment indexed by condition position.
    ///
    /// # Panics
    ///
    /// Panics if the expression references a position outside `values`.
    pub fn eval(&self, values: &[bool]) -> bool {
        match self {
            Expr::Const(b) => *b,
            Expr::Var(k) => values[*k],
            Expr::Not(a) => !a.eval(values),
            Expr::And(a, b) => a.eval(values) && b.eval(values),
            Expr::Or(a, b) => a.eval(values) || b.eval(values),
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Expr::Const(_) | Expr::Var(_) => 1,
            Expr::Not(a) => 1 + a.size(),
            Expr::And(a, b) | Expr::Or(a, b) => 1 + a.size() + b.size(),
        }
    }

    /// Largest condition position referenced, if any.
    pub fn max_var(&self) -> Option<usize> {
        match self {
            Expr::Const(_) => None,
            Expr::Var(k) => Some(*k),
            Expr::Not(a) => a.max_var(),
            Expr::And(a, b) | Expr::Or(a, b) => a.max_var().max(b.max_var()),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Or(..) => 1,
            Expr::And(..) => 2,
            Expr::Not(_) => 3,
            Expr::Const(_) | Expr::Var(_) => 4,
        }
    }
}

/// A parsed decision: its syntax tree together with the ordered condition list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    conditions: Vec<String>,
    expr: Expr,
}

impl Decision {
    /// Creates a decision.
    ///
    /// # Panics
    ///
    /// Panics if `expr` references a condition position outside `conditions`.
    pub fn new(conditions: Vec<String>, expr: Expr) -> Self {
        if let Some(k) = expr.max_var() {
            assert!(
                k < conditions.len(),
                "expression references condition {} but only {} conditions are given",
                k,
                conditions.len()
            );
        }
        Self { conditions, expr }
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn num_conditions(&self) -> usize {
        self.conditions.len()
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Decision outcome for an assignment indexed by condition position.
    pub fn evaluate(&self, values: &[bool]) -> bool {
        assert_eq!(
            values.len(),
            self.conditions.len(),
            "assignment must have one value per condition"
        );
        self.expr.eval(values)
    }

    fn fmt_expr(&self, expr: &Expr, min_prec: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = expr.precedence();
        if prec < min_prec {
            write!(f, "(")?;
        }
        match expr {
            Expr::Const(true) => write!(f, "True")?,
            Expr::Const(false) => write!(f, "False")?,
            Expr::Var(k) => write!(f, "{}", self.conditions[*k])?,
            Expr::Not(a) => {
                write!(f, "not ")?;
                self.fmt_expr(a, 3, f)?;
            }
            Expr::And(a, b) => {
                self.fmt_expr(a, 2, f)?;
                write!(f, " and ")?;
                self.fmt_expr(b, 3, f)?;
            }
            Expr::Or(a, b) => {
                self.fmt_expr(a, 1, f)?;
                write!(f, " or ")?;
                self.fmt_expr(b, 2, f)?;
            }
        }
        if prec < min_prec {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_expr(&self.expr, 0, f)
    }
}
