//! Syntax errors raised while tokenizing and parsing formulas.

/// Errors that can occur while validating a formula.
///
/// Every variant carries a 0-based character offset into the formula,
/// available through [`FormulaError::position`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("formula must be {max} characters or less (got {len})")]
    TooLong { len: usize, max: usize },

    #[error("illegal character '{ch}' at position {position}")]
    IllegalCharacter { ch: char, position: usize },

    #[error("invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("unexpected {found} at position {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        position: usize,
    },

    #[error("operator '{op}' at position {position} is missing its right operand")]
    DanglingOperator { op: char, position: usize },

    #[error("unexpected end of formula at position {position}")]
    UnexpectedEnd { position: usize },

    #[error("unmatched '(' at position {position}")]
    UnclosedParen { position: usize },

    #[error("unmatched ')' at position {position}")]
    UnmatchedCloseParen { position: usize },

    #[error("parentheses nested deeper than {limit} levels at position {position}")]
    TooDeep { limit: usize, position: usize },

    #[error("formula nests more than {limit} operations deep at position {position}")]
    TooComplex { limit: usize, position: usize },
}

impl FormulaError {
    /// Character offset the error refers to.
    pub fn position(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::TooLong { max, .. } => *max,
            Self::IllegalCharacter { position, .. }
            | Self::InvalidNumber { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::DanglingOperator { position, .. }
            | Self::UnexpectedEnd { position }
            | Self::UnclosedParen { position }
            | Self::UnmatchedCloseParen { position }
            | Self::TooDeep { position, .. }
            | Self::TooComplex { position, .. } => *position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_include_position() {
        let err = FormulaError::IllegalCharacter { ch: '$', position: 4 };
        assert_eq!(err.to_string(), "illegal character '$' at position 4");
        assert_eq!(err.position(), 4);

        let err = FormulaError::UnclosedParen { position: 10 };
        assert_eq!(err.to_string(), "unmatched '(' at position 10");
    }

    #[test]
    fn empty_points_at_start() {
        assert_eq!(FormulaError::Empty.position(), 0);
    }
}
