//! Token model shared by every token source and the parser
//!
//! A token is classified twice: a coarse [`TokenKind`] and a finer
//! [`TokenSubKind`]. The parser only ever matches on the `(kind, subkind)`
//! pair; `content` is kept verbatim so literals reach the AST untouched.

pub mod json;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Parenthesis,
    Operator,
    Literal,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [
        TokenKind::Parenthesis,
        TokenKind::Operator,
        TokenKind::Literal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Parenthesis => "parenthesis",
            TokenKind::Operator => "operator",
            TokenKind::Literal => "literal",
        }
    }

    /// Subkinds that may be paired with this kind
    pub fn subkinds(self) -> &'static [TokenSubKind] {
        match self {
            TokenKind::Parenthesis => &[TokenSubKind::Left, TokenSubKind::Right],
            TokenKind::Operator => &[
                TokenSubKind::Plus,
                TokenSubKind::Minus,
                TokenSubKind::Multiply,
                TokenSubKind::Divide,
            ],
            TokenKind::Literal => &[TokenSubKind::Float],
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSubKind {
    Left,
    Right,
    Plus,
    Minus,
    Multiply,
    Divide,
    Float,
}

impl TokenSubKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenSubKind::Left => "left",
            TokenSubKind::Right => "right",
            TokenSubKind::Plus => "plus",
            TokenSubKind::Minus => "minus",
            TokenSubKind::Multiply => "multiplication",
            TokenSubKind::Divide => "division",
            TokenSubKind::Float => "float",
        }
    }
}

impl fmt::Display for TokenSubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grammar symbol name for a `(kind, subkind)` pair, e.g. `operator.plus`
pub fn symbol(kind: TokenKind, subkind: TokenSubKind) -> String {
    format!("{kind}.{subkind}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub content: String,
    pub kind: TokenKind,
    pub subkind: TokenSubKind,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl Token {
    pub fn new(content: impl Into<String>, kind: TokenKind, subkind: TokenSubKind) -> Self {
        Self {
            content: content.into(),
            kind,
            subkind,
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn is(&self, kind: TokenKind, subkind: TokenSubKind) -> bool {
        self.kind == kind && self.subkind == subkind
    }

    pub fn symbol(&self) -> String {
        symbol(self.kind, self.subkind)
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                format!("{} '{}' at {}:{}", self.symbol(), self.content, line, column)
            }
            _ => format!("{} '{}'", self.symbol(), self.content),
        }
    }

    pub fn float(value: impl Into<String>) -> Self {
        Self::new(value, TokenKind::Literal, TokenSubKind::Float)
    }

    pub fn plus() -> Self {
        Self::new("+", TokenKind::Operator, TokenSubKind::Plus)
    }

    pub fn minus() -> Self {
        Self::new("-", TokenKind::Operator, TokenSubKind::Minus)
    }

    pub fn multiply() -> Self {
        Self::new("*", TokenKind::Operator, TokenSubKind::Multiply)
    }

    pub fn divide() -> Self {
        Self::new("/", TokenKind::Operator, TokenSubKind::Divide)
    }

    pub fn left_paren() -> Self {
        Self::new("(", TokenKind::Parenthesis, TokenSubKind::Left)
    }

    pub fn right_paren() -> Self {
        Self::new(")", TokenKind::Parenthesis, TokenSubKind::Right)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
