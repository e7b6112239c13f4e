//! Recursive-descent parser and validator.
//!
//! Grammar:
//!
//! ```text
//! expr    := term (("+" | "-") term)*
//! term    := unary (("*" | "/" | "%") unary)*
//! unary   := "-"? primary
//! primary := number | identifier | "(" expr ")"
//! ```

use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOp, Expr};
use crate::error::FormulaError;
use crate::lexer::{Token, TokenKind, tokenize};

/// Default maximum formula length in characters.
pub const DEFAULT_MAX_LENGTH: usize = 1000;

/// Default maximum parenthesis nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum height of the parsed tree.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 512;

/// Ceiling for both depth limits, whatever [`Limits`] asks for.
/// Evaluation and rendering recurse once per tree level.
pub const HARD_DEPTH_LIMIT: usize = 1024;

/// Static guards against pathological input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum formula length in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Maximum number of simultaneously open parentheses.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum height of the parsed tree. A chain like `a + b + c` grows
    /// one level per operator even without parentheses.
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_tree_depth() -> usize {
    DEFAULT_MAX_TREE_DEPTH
}

/// Parse a formula with the default [`Limits`].
pub fn parse(formula: &str) -> Result<Expr, FormulaError> {
    parse_with_limits(formula, &Limits::default())
}

/// Parse a formula into an [`Expr`], enforcing `limits`.
pub fn parse_with_limits(formula: &str, limits: &Limits) -> Result<Expr, FormulaError> {
    let len = formula.chars().count();
    if len > limits.max_length {
        return Err(FormulaError::TooLong {
            len,
            max: limits.max_length,
        });
    }

    let tokens = tokenize(formula)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: len,
        open: Vec::new(),
        max_depth: limits.max_depth.min(HARD_DEPTH_LIMIT),
        max_tree_depth: limits.max_tree_depth.min(HARD_DEPTH_LIMIT),
    };
    let (expr, _) = parser.expr()?;

    if let Some(tok) = parser.peek() {
        return Err(match tok.kind {
            TokenKind::RParen => FormulaError::UnmatchedCloseParen {
                position: tok.position,
            },
            _ => FormulaError::UnexpectedToken {
                found: tok.describe(),
                expected: "an operator",
                position: tok.position,
            },
        });
    }

    Ok(expr)
}

/// Check that a formula parses, without evaluating it.
pub fn validate_formula(formula: &str) -> Result<(), FormulaError> {
    parse(formula).map(|_| ())
}

/// Like [`validate_formula`] with explicit limits.
pub fn validate_formula_with(formula: &str, limits: &Limits) -> Result<(), FormulaError> {
    parse_with_limits(formula, limits).map(|_| ())
}

/// Serializable validation outcome: `{"valid": true}` or
/// `{"valid": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<Result<T, FormulaError>> for Validation {
    fn from(result: Result<T, FormulaError>) -> Self {
        match result {
            Ok(_) => Self {
                valid: true,
                error: None,
            },
            Err(e) => Self {
                valid: false,
                error: Some(e.to_string()),
            },
        }
    }
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    /// Formula length in characters, reported for errors at end of input.
    end: usize,
    /// Positions of currently open parentheses.
    open: Vec<usize>,
    max_depth: usize,
    max_tree_depth: usize,
}

/// A subtree and its height.
type Node = (Expr, usize);

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let tok = self.tokens.get(self.pos).copied();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Consume the next token if it is one of `ops`, returning the
    /// operator and its position.
    fn eat_operator(&mut self, ops: &[BinaryOp]) -> Option<(BinaryOp, usize)> {
        let tok = self.peek()?;
        if tok.kind != TokenKind::Operator {
            return None;
        }
        let op = BinaryOp::from_symbol(tok.text).filter(|op| ops.contains(op))?;
        let position = tok.position;
        self.pos += 1;
        Some((op, position))
    }

    /// Wrap children in a new node, enforcing the tree height limit.
    fn grow(&self, height: usize, position: usize) -> Result<usize, FormulaError> {
        let height = height + 1;
        if height > self.max_tree_depth {
            return Err(FormulaError::TooComplex {
                limit: self.max_tree_depth,
                position,
            });
        }
        Ok(height)
    }

    fn expr(&mut self) -> Result<Node, FormulaError> {
        let (mut lhs, mut height) = self.term()?;
        while let Some((op, position)) = self.eat_operator(&[BinaryOp::Add, BinaryOp::Sub]) {
            let (rhs, rhs_height) = self.term()?;
            height = self.grow(height.max(rhs_height), position)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok((lhs, height))
    }

    fn term(&mut self) -> Result<Node, FormulaError> {
        let (mut lhs, mut height) = self.unary()?;
        while let Some((op, position)) =
            self.eat_operator(&[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod])
        {
            let (rhs, rhs_height) = self.unary()?;
            height = self.grow(height.max(rhs_height), position)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok((lhs, height))
    }

    fn unary(&mut self) -> Result<Node, FormulaError> {
        if let Some((_, position)) = self.eat_operator(&[BinaryOp::Sub]) {
            let (operand, height) = self.primary()?;
            return Ok((Expr::neg(operand), self.grow(height, position)?));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Node, FormulaError> {
        let Some(tok) = self.advance() else {
            return Err(self.missing_operand());
        };

        match tok.kind {
            TokenKind::Number => tok
                .text
                .parse::<f64>()
                .map(|n| (Expr::Number(n), 1))
                .map_err(|_| FormulaError::InvalidNumber {
                    text: tok.text.to_string(),
                    position: tok.position,
                }),
            TokenKind::Identifier => Ok((Expr::Variable(tok.text.to_string()), 1)),
            TokenKind::LParen => {
                if self.open.len() >= self.max_depth {
                    return Err(FormulaError::TooDeep {
                        limit: self.max_depth,
                        position: tok.position,
                    });
                }
                self.open.push(tok.position);
                let inner = self.expr()?;
                match self.advance() {
                    Some(close) if close.kind == TokenKind::RParen => {
                        self.open.pop();
                        Ok(inner)
                    }
                    Some(other) => Err(FormulaError::UnexpectedToken {
                        found: other.describe(),
                        expected: "')' or an operator",
                        position: other.position,
                    }),
                    None => Err(FormulaError::UnclosedParen {
                        position: tok.position,
                    }),
                }
            }
            TokenKind::Operator | TokenKind::RParen => Err(FormulaError::UnexpectedToken {
                found: tok.describe(),
                expected: "an operand",
                position: tok.position,
            }),
        }
    }

    /// Error for running out of input where an operand was required.
    /// An open group takes precedence over a dangling operator.
    fn missing_operand(&self) -> FormulaError {
        if let Some(&position) = self.open.last() {
            return FormulaError::UnclosedParen { position };
        }
        match self.tokens.last() {
            Some(tok) if tok.kind == TokenKind::Operator => FormulaError::DanglingOperator {
                op: tok.text.chars().next().unwrap_or('?'),
                position: tok.position,
            },
            _ => FormulaError::UnexpectedEnd { position: self.end },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn var(name: &str) -> Expr {
        Expr::Variable(name.to_string())
    }

    #[test]
    fn respects_precedence() {
        let e = parse("a + b * c").unwrap();
        assert_eq!(
            e,
            Expr::binary(
                BinaryOp::Add,
                var("a"),
                Expr::binary(BinaryOp::Mul, var("b"), var("c"))
            )
        );
    }

    #[test]
    fn operators_are_left_associative() {
        let e = parse("a - b - c").unwrap();
        assert_eq!(
            e,
            Expr::binary(
                BinaryOp::Sub,
                Expr::binary(BinaryOp::Sub, var("a"), var("b")),
                var("c")
            )
        );
    }

    #[test]
    fn parentheses_reset_precedence() {
        let e = parse("(a + b) * c").unwrap();
        assert_eq!(
            e,
            Expr::binary(
                BinaryOp::Mul,
                Expr::binary(BinaryOp::Add, var("a"), var("b")),
                var("c")
            )
        );
    }

    #[test]
    fn unary_minus_binds_tightest() {
        let e = parse("-a * 2").unwrap();
        assert_eq!(
            e,
            Expr::binary(BinaryOp::Mul, Expr::neg(var("a")), Expr::Number(2.0))
        );
        assert_eq!(parse("2 * -3").unwrap().to_string(), "2 * -3");
    }

    #[test]
    fn canonical_rendering() {
        insta::assert_snapshot!(
            parse("( revenue-cost )/cost*100").unwrap(),
            @"(revenue - cost) / cost * 100"
        );
        insta::assert_snapshot!(parse("((((x))))").unwrap(), @"x");
        insta::assert_snapshot!(parse("a % (b % c)").unwrap(), @"a % (b % c)");
    }

    #[test]
    fn empty_and_blank_are_rejected() {
        assert_eq!(parse(""), Err(FormulaError::Empty));
        assert_eq!(parse("   "), Err(FormulaError::Empty));
    }

    #[test]
    fn unclosed_group_reports_open_paren() {
        let err = validate_formula("revenue * (1 +").unwrap_err();
        assert_eq!(err, FormulaError::UnclosedParen { position: 10 });
        assert!(err.to_string().contains("'('"));

        assert_eq!(
            validate_formula("(a"),
            Err(FormulaError::UnclosedParen { position: 0 })
        );
        assert_eq!(
            validate_formula("((a) + (b"),
            Err(FormulaError::UnclosedParen { position: 7 })
        );
    }

    #[test]
    fn stray_close_paren() {
        assert_eq!(
            validate_formula("a + b)"),
            Err(FormulaError::UnmatchedCloseParen { position: 5 })
        );
    }

    #[test]
    fn trailing_operator() {
        assert_eq!(
            validate_formula("revenue +"),
            Err(FormulaError::DanglingOperator { op: '+', position: 8 })
        );
        assert_eq!(
            validate_formula("-"),
            Err(FormulaError::DanglingOperator { op: '-', position: 0 })
        );
    }

    #[test]
    fn consecutive_operands() {
        let err = validate_formula("revenue cost").unwrap_err();
        assert_eq!(
            err,
            FormulaError::UnexpectedToken {
                found: "identifier 'cost'".into(),
                expected: "an operator",
                position: 8,
            }
        );
        assert!(validate_formula("2 (3)").is_err());
        assert!(validate_formula("(a b)").is_err());
    }

    #[test]
    fn consecutive_operators() {
        let err = validate_formula("a + * b").unwrap_err();
        assert_eq!(err.position(), 4);
        // Only a single unary minus is allowed per operand.
        assert!(validate_formula("--a").is_err());
        assert!(validate_formula("+a").is_err());
    }

    #[test]
    fn empty_group() {
        let err = validate_formula("()").unwrap_err();
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn illegal_character_surfaces() {
        assert_eq!(
            validate_formula("max(a, b)"),
            Err(FormulaError::IllegalCharacter { ch: ',', position: 5 })
        );
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let limits = Limits {
            max_depth: 3,
            ..Limits::default()
        };
        assert!(validate_formula_with("(((a)))", &limits).is_ok());
        assert_eq!(
            validate_formula_with("((((a))))", &limits),
            Err(FormulaError::TooDeep { limit: 3, position: 3 })
        );

        let deep = format!("{}1{}", "(".repeat(65), ")".repeat(65));
        assert!(matches!(
            validate_formula(&deep),
            Err(FormulaError::TooDeep { limit: 64, .. })
        ));
        let ok = format!("{}1{}", "(".repeat(64), ")".repeat(64));
        assert!(validate_formula(&ok).is_ok());
    }

    #[test]
    fn operator_chains_are_bounded() {
        let limits = Limits {
            max_tree_depth: 4,
            ..Limits::default()
        };
        // Three operators over leaves: height 4.
        assert!(validate_formula_with("a + b + c + d", &limits).is_ok());
        assert!(validate_formula_with("-a * b + c", &limits).is_ok());
        assert_eq!(
            validate_formula_with("a + b + c + d + e", &limits),
            Err(FormulaError::TooComplex { limit: 4, position: 14 })
        );
        assert!(matches!(
            validate_formula_with("-(-(-(-a)))", &limits),
            Err(FormulaError::TooComplex { limit: 4, .. })
        ));
    }

    #[test]
    fn long_chain_is_rejected_even_without_length_limit() {
        let chain = vec!["1"; 200_000].join("+");
        let limits = Limits {
            max_length: usize::MAX,
            max_depth: usize::MAX,
            max_tree_depth: usize::MAX,
        };
        assert!(matches!(
            parse_with_limits(&chain, &limits),
            Err(FormulaError::TooComplex { limit: HARD_DEPTH_LIMIT, .. })
        ));

        let fits = vec!["1"; DEFAULT_MAX_TREE_DEPTH].join("+");
        assert_eq!(
            parse_with_limits(&fits, &limits).unwrap().evaluate(&Default::default()),
            DEFAULT_MAX_TREE_DEPTH as f64
        );
    }

    #[test]
    fn length_is_bounded() {
        let limits = Limits {
            max_length: 5,
            ..Limits::default()
        };
        assert!(validate_formula_with("a + b", &limits).is_ok());
        assert_eq!(
            validate_formula_with("a + bc", &limits),
            Err(FormulaError::TooLong { len: 6, max: 5 })
        );
    }

    #[test]
    fn validation_view_serializes() {
        let ok: Validation = validate_formula("a").into();
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"valid":true}"#);

        let bad: Validation = validate_formula("a +").into();
        assert!(!bad.valid);
        assert_eq!(
            bad.error.as_deref(),
            Some("operator '+' at position 2 is missing its right operand")
        );
    }
}
