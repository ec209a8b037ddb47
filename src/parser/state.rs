use thiserror::Error;

use crate::token::Token;

/// Symbol reported when tokens remain after a complete expression
pub const END_OF_STREAM: &str = "end of stream";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// One of these grammar symbols was required here
    #[error("Expected one of {}", format_expected(.0))]
    Expected(Vec<String>),

    /// The token matched a branch whose symbol table has no entry for it
    #[error("Unknown token `{0}`")]
    UnknownToken(String),

    #[error("Unknown error")]
    Generic,
}

fn format_expected(symbols: &[String]) -> String {
    symbols
        .iter()
        .map(|symbol| format!("`{symbol}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ParseError {
    pub fn expected(symbol: impl Into<String>) -> Self {
        ParseError::Expected(vec![symbol.into()])
    }

    /// Combine the failures of two alternatives
    ///
    /// Expected-sets are merged, anything else degrades to `Generic`.
    pub fn merge(self, other: ParseError) -> ParseError {
        match (self, other) {
            (ParseError::Expected(mut lhs), ParseError::Expected(rhs)) => {
                for symbol in rhs {
                    if !lhs.contains(&symbol) {
                        lhs.push(symbol);
                    }
                }
                ParseError::Expected(lhs)
            }
            _ => ParseError::Generic,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Cursor over the tokens of a single parse
///
/// Backtracking saves [`TokenStream::position`] and hands it back to
/// [`TokenStream::restore`]; the tokens themselves are never copied.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Dereference the cursor, failing past the last token
    pub fn current(&self) -> ParseResult<&Token> {
        self.peek().ok_or(ParseError::Generic)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn is_end_of_stream(&self) -> bool {
        !self.has_next()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn restore(&mut self, position: usize) {
        self.index = position.min(self.tokens.len());
    }

    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.index..]
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

pub trait Parser<T> {
    fn parse(&self, stream: &mut TokenStream) -> ParseResult<T>;
}

impl<T, F: Fn(&mut TokenStream) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, stream: &mut TokenStream) -> ParseResult<T> {
        self(stream)
    }
}
