//! Restricted-grammar formula system for damage and healing amounts.
//!
//! Formulas are authored as text over the five stat names, numeric literals,
//! `+ - * /` and parentheses:
//!
//! ```text
//! strength * 1.2 + 10
//! (intelligence + luck / 2) * 1.5
//! ```
//!
//! Text is parsed once (at registry load time) into a small [`Expr`] tree and
//! evaluated against a [`StatBlock`]. No other tokens are accepted, so content
//! from untrusted authors cannot execute anything beyond arithmetic.

mod evaluate;
mod parse;

pub use evaluate::{AmountKind, Evaluated, resolve_amount};
pub(crate) use evaluate::floor_amount;

use std::fmt;

use crate::error::{CombatError, ErrorSeverity};
use crate::stats::{StatBlock, StatKind};

// ============================================================================
// Formula Definition
// ============================================================================

/// Binary operators supported by the grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub const fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// Parsed expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),

    /// Reference to one of the caster's stats.
    Stat(StatKind),

    /// Unary minus.
    Neg(Box<Expr>),

    /// Binary arithmetic.
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// A parsed formula together with its source text.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parses formula text. Fails on any token outside the grammar.
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let expr = parse::parse(source)?;
        Ok(Self {
            source: source.trim().to_owned(),
            expr,
        })
    }

    /// A formula that always yields `value`.
    pub fn constant(value: f64) -> Self {
        Self {
            source: value.to_string(),
            expr: Expr::Number(value),
        }
    }

    /// `strength * 1.2 + 10`, the damage of the always-available attack.
    pub fn basic_attack() -> Self {
        Self {
            source: "strength * 1.2 + 10".to_owned(),
            expr: Expr::Binary {
                op: BinaryOp::Add,
                lhs: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    lhs: Box::new(Expr::Stat(StatKind::Strength)),
                    rhs: Box::new(Expr::Number(1.2)),
                }),
                rhs: Box::new(Expr::Number(10.0)),
            },
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluates against a stat snapshot.
    ///
    /// Fails on division by zero and on non-finite intermediate results.
    pub fn evaluate(&self, stats: &StatBlock) -> Result<f64, FormulaError> {
        evaluate::eval(&self.expr, stats)
    }

    /// Stats referenced anywhere in the expression.
    pub fn referenced_stats(&self) -> Vec<StatKind> {
        let mut out = Vec::new();
        collect_stats(&self.expr, &mut out);
        out
    }
}

fn collect_stats(expr: &Expr, out: &mut Vec<StatKind>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Stat(kind) => {
            if !out.contains(kind) {
                out.push(*kind);
            }
        }
        Expr::Neg(inner) => collect_stats(inner, out),
        Expr::Binary { lhs, rhs, .. } => {
            collect_stats(lhs, out);
            collect_stats(rhs, out);
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl TryFrom<String> for Formula {
    type Error = FormulaError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Formula::parse(&source)
    }
}

impl From<Formula> for String {
    fn from(formula: Formula) -> Self {
        formula.source
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failure to parse or evaluate a formula.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unknown identifier '{0}' (expected a stat name)")]
    UnknownIdentifier(String),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,
}

impl CombatError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FormulaError::DivisionByZero | FormulaError::NonFinite => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            FormulaError::Empty => "FORMULA_EMPTY",
            FormulaError::UnexpectedChar { .. } => "FORMULA_UNEXPECTED_CHAR",
            FormulaError::UnknownIdentifier(_) => "FORMULA_UNKNOWN_IDENTIFIER",
            FormulaError::InvalidNumber(_) => "FORMULA_INVALID_NUMBER",
            FormulaError::UnexpectedToken { .. } => "FORMULA_UNEXPECTED_TOKEN",
            FormulaError::UnexpectedEnd => "FORMULA_UNEXPECTED_END",
            FormulaError::DivisionByZero => "FORMULA_DIVISION_BY_ZERO",
            FormulaError::NonFinite => "FORMULA_NON_FINITE",
        }
    }
}
