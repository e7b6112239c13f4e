//! Evaluate formulas against a variable context.
//!
//! Evaluation is total: division or modulo by zero yields `0`, missing
//! variables read as `0`, and a non-finite final result is coerced to `0`.
//! Each absorbed condition is reported as a [`NumericDeviation`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::{BinaryOp, Expr};
use crate::error::FormulaError;
use crate::parser::{Limits, parse, parse_with_limits};

/// Variable values supplied for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableContext {
    values: HashMap<String, f64>,
}

impl VariableContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Lookup used by the evaluator: unknown names read as `0`.
    pub fn get_or_zero(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<HashMap<String, f64>> for VariableContext {
    fn from(values: HashMap<String, f64>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for VariableContext {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, f64)> for VariableContext {
    fn extend<I: IntoIterator<Item = (K, f64)>>(&mut self, iter: I) {
        self.values
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}

/// A numeric condition that evaluation absorbed into `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericDeviation {
    DivisionByZero,
    ModuloByZero,
    NonFinite,
}

impl fmt::Display for NumericDeviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DivisionByZero => "division by zero",
            Self::ModuloByZero => "modulo by zero",
            Self::NonFinite => "non-finite result",
        })
    }
}

/// Result of a detailed evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Always finite.
    pub value: f64,
    /// Absorbed conditions, in evaluation order.
    pub deviations: Vec<NumericDeviation>,
}

impl Evaluation {
    pub fn is_clean(&self) -> bool {
        self.deviations.is_empty()
    }
}

impl Expr {
    /// Evaluate against `ctx`. The result is always finite.
    pub fn evaluate(&self, ctx: &VariableContext) -> f64 {
        self.evaluate_detailed(ctx).value
    }

    /// Evaluate against `ctx`, also reporting absorbed numeric conditions.
    pub fn evaluate_detailed(&self, ctx: &VariableContext) -> Evaluation {
        let mut deviations = Vec::new();
        let raw = eval_node(self, ctx, &mut deviations);
        let value = if raw.is_finite() {
            // Normalise -0 so equal inputs render identically.
            if raw == 0.0 { 0.0 } else { raw }
        } else {
            warn!(result = %raw, "non-finite formula result coerced to 0");
            deviations.push(NumericDeviation::NonFinite);
            0.0
        };
        Evaluation { value, deviations }
    }
}

fn eval_node(expr: &Expr, ctx: &VariableContext, deviations: &mut Vec<NumericDeviation>) -> f64 {
    match expr {
        Expr::Number(n) => *n,
        Expr::Variable(name) => ctx.get_or_zero(name),
        Expr::Neg(inner) => -eval_node(inner, ctx, deviations),
        Expr::Binary { op, lhs, rhs } => {
            let l = eval_node(lhs, ctx, deviations);
            let r = eval_node(rhs, ctx, deviations);
            match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div if r == 0.0 => {
                    debug!(dividend = l, "division by zero evaluates to 0");
                    deviations.push(NumericDeviation::DivisionByZero);
                    0.0
                }
                BinaryOp::Div => l / r,
                BinaryOp::Mod if r == 0.0 => {
                    debug!(dividend = l, "modulo by zero evaluates to 0");
                    deviations.push(NumericDeviation::ModuloByZero);
                    0.0
                }
                BinaryOp::Mod => l % r,
            }
        }
    }
}

/// Parse `formula` and evaluate it against `ctx`.
pub fn evaluate_formula(formula: &str, ctx: &VariableContext) -> Result<f64, FormulaError> {
    Ok(parse(formula)?.evaluate(ctx))
}

/// Parse with explicit limits and evaluate, reporting deviations.
pub fn evaluate_formula_with(
    formula: &str,
    ctx: &VariableContext,
    limits: &Limits,
) -> Result<Evaluation, FormulaError> {
    Ok(parse_with_limits(formula, limits)?.evaluate_detailed(ctx))
}
