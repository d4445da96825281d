//! Formula evaluation and amount resolution.

use super::{BinaryOp, Expr, Formula, FormulaError};
use crate::stats::StatBlock;

pub(super) fn eval(expr: &Expr, stats: &StatBlock) -> Result<f64, FormulaError> {
    let value = match expr {
        Expr::Number(value) => *value,
        Expr::Stat(kind) => stats.get(*kind),
        Expr::Neg(inner) => -eval(inner, stats)?,
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs, stats)?;
            let rhs = eval(rhs, stats)?;
            match op {
                BinaryOp::Add => lhs + rhs,
                BinaryOp::Sub => lhs - rhs,
                BinaryOp::Mul => lhs * rhs,
                BinaryOp::Div => {
                    if rhs == 0.0 {
                        return Err(FormulaError::DivisionByZero);
                    }
                    lhs / rhs
                }
            }
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NonFinite)
    }
}

/// What an evaluated amount will be used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmountKind {
    /// Damage amounts are at least 1.
    Damage,
    /// Healing amounts are at least 0.
    Healing,
}

impl AmountKind {
    pub const fn minimum(self) -> f64 {
        match self {
            AmountKind::Damage => 1.0,
            AmountKind::Healing => 0.0,
        }
    }
}

/// Result of a fail-soft evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluated {
    /// Raw (unfloored) value, or the fallback when evaluation failed.
    pub raw: f64,

    /// Set when the fallback was substituted.
    pub error: Option<FormulaError>,
}

impl Evaluated {
    /// Evaluates `formula`, substituting `fallback` on failure.
    pub fn soft(formula: &Formula, stats: &StatBlock, fallback: u32) -> Self {
        match formula.evaluate(stats) {
            Ok(raw) => Self { raw, error: None },
            Err(error) => Self {
                raw: fallback as f64,
                error: Some(error),
            },
        }
    }

    pub fn fell_back(&self) -> bool {
        self.error.is_some()
    }

    /// Floors to an integer and applies the minimum for `kind`.
    pub fn amount(&self, kind: AmountKind) -> u32 {
        floor_amount(self.raw, kind)
    }
}

/// Resolves a formula to a final integer amount.
///
/// The result is floored and clamped to the minimum for `kind` (1 for damage,
/// 0 for healing). Evaluation failures yield `fallback` instead of an error,
/// reported through [`Evaluated::error`].
pub fn resolve_amount(
    formula: &Formula,
    stats: &StatBlock,
    kind: AmountKind,
    fallback: u32,
) -> (u32, Evaluated) {
    let evaluated = Evaluated::soft(formula, stats, fallback);
    (evaluated.amount(kind), evaluated)
}

pub(crate) fn floor_amount(raw: f64, kind: AmountKind) -> u32 {
    let floored = raw.floor().max(kind.minimum());
    if floored >= u32::MAX as f64 {
        u32::MAX
    } else {
        floored as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatKind;

    fn stats() -> StatBlock {
        StatBlock::uniform(0.0)
            .with(StatKind::Strength, 10.0)
            .with(StatKind::Intelligence, 14.0)
            .with(StatKind::Luck, 3.0)
    }

    #[test]
    fn basic_attack_formula_yields_22() {
        let formula = Formula::parse("strength * 1.2 + 10").unwrap();
        let (amount, evaluated) = resolve_amount(&formula, &stats(), AmountKind::Damage, 10);
        assert_eq!(amount, 22);
        assert!(!evaluated.fell_back());
    }

    #[test]
    fn built_in_basic_attack_matches_parsed_text() {
        assert_eq!(
            Formula::basic_attack(),
            Formula::parse("strength * 1.2 + 10").unwrap()
        );
    }

    #[test]
    fn parentheses_and_unary_minus() {
        let formula = Formula::parse("-(luck - intelligence) / 2").unwrap();
        assert_eq!(formula.evaluate(&stats()), Ok(5.5));
    }

    #[test]
    fn damage_is_at_least_one_and_healing_at_least_zero() {
        let formula = Formula::parse("luck - strength").unwrap();
        assert_eq!(resolve_amount(&formula, &stats(), AmountKind::Damage, 10).0, 1);
        assert_eq!(resolve_amount(&formula, &stats(), AmountKind::Healing, 10).0, 0);
    }

    #[test]
    fn division_by_zero_falls_back() {
        let formula = Formula::parse("strength / agility").unwrap();
        let (amount, evaluated) = resolve_amount(&formula, &stats(), AmountKind::Damage, 10);
        assert_eq!(amount, 10);
        assert_eq!(evaluated.error, Some(FormulaError::DivisionByZero));
    }

    #[test]
    fn referenced_stats_are_deduplicated() {
        let formula = Formula::parse("strength + strength * luck").unwrap();
        assert_eq!(
            formula.referenced_stats(),
            vec![StatKind::Strength, StatKind::Luck]
        );
    }
}
