//! Tokenizer for metric formulas.
//!
//! Numbers match `\d+(\.\d+)?`, identifiers match `[A-Za-z_][A-Za-z0-9_]*`,
//! and the only other accepted characters are `+ - * / % ( )` and
//! whitespace. Positions are character offsets, not byte offsets.

use crate::error::FormulaError;

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Identifier,
    Operator,
    LParen,
    RParen,
}

/// A lexed token borrowing its text from the formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 0-based character offset of the first character.
    pub position: usize,
}

impl Token<'_> {
    /// Human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Number => format!("number {}", self.text),
            TokenKind::Identifier => format!("identifier '{}'", self.text),
            TokenKind::Operator => format!("operator '{}'", self.text),
            TokenKind::LParen | TokenKind::RParen => format!("'{}'", self.text),
        }
    }
}

/// Streaming tokenizer.
///
/// Yields `Err` for an illegal character and then resumes after it, so
/// callers that only care about some tokens can skip errors.
pub struct Lexer<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            pos: 0,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).map(|&(_, c)| c)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn byte_offset(&self, idx: usize) -> usize {
        self.chars.get(idx).map_or(self.src.len(), |&(b, _)| b)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, FormulaError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.eat_while(char::is_whitespace);

        let start = self.pos;
        let c = self.peek()?;
        let kind = match c {
            '0'..='9' => {
                self.eat_while(|c| c.is_ascii_digit());
                // A fraction needs at least one digit after the dot.
                if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                    self.eat_while(|c| c.is_ascii_digit());
                }
                TokenKind::Number
            }
            c if is_ident_start(c) => {
                self.pos += 1;
                self.eat_while(is_ident_cont);
                TokenKind::Identifier
            }
            '+' | '-' | '*' | '/' | '%' => {
                self.pos += 1;
                TokenKind::Operator
            }
            '(' => {
                self.pos += 1;
                TokenKind::LParen
            }
            ')' => {
                self.pos += 1;
                TokenKind::RParen
            }
            other => {
                self.pos += 1;
                return Some(Err(FormulaError::IllegalCharacter {
                    ch: other,
                    position: start,
                }));
            }
        };

        let text = &self.src[self.byte_offset(start)..self.byte_offset(self.pos)];
        Some(Ok(Token {
            kind,
            text,
            position: start,
        }))
    }
}

/// Tokenize a whole formula, failing on the first illegal character.
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, FormulaError> {
    Lexer::new(src).collect()
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_ident_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
