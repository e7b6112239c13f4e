//! Variable extraction without evaluation.

use std::collections::BTreeSet;

use crate::lexer::{Lexer, TokenKind};

/// Collect the distinct identifiers referenced by `formula`.
///
/// Never fails: illegal characters are skipped, so this also works on
/// formulas that would not validate. Callers use the result to decide
/// which data sources to query before evaluating.
pub fn extract_variables(formula: &str) -> BTreeSet<String> {
    Lexer::new(formula)
        .filter_map(Result::ok)
        .filter(|tok| tok.kind == TokenKind::Identifier)
        .map(|tok| tok.text.to_string())
        .collect()
}
