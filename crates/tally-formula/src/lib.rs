//! Custom metric formula language.
//!
//! Tenants define metrics as small arithmetic expressions over named
//! business variables, e.g. `(revenue - cost) / cost * 100`. The grammar is
//! closed: numbers, identifiers, `+ - * / %`, unary minus and parentheses.
//! There are no calls, comparisons, or strings, and parenthesis nesting is
//! bounded, so evaluating a stored formula cannot loop or exhaust the stack.
//!
//! All functions are pure; nothing is cached between calls.

pub mod ast;
pub mod catalog;
pub mod error;
pub mod eval;
pub mod extract;
pub mod lexer;
pub mod parser;

pub use ast::{BinaryOp, Expr};
pub use error::FormulaError;
pub use eval::{Evaluation, NumericDeviation, VariableContext, evaluate_formula, evaluate_formula_with};
pub use extract::extract_variables;
pub use parser::{Limits, Validation, parse, parse_with_limits, validate_formula, validate_formula_with};
