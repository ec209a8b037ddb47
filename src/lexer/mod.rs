//! Text lexer for arithmetic source such as `-(1.5 + 2) * 3`
//!
//! Tokens are recognised with `lachs` and converted into the parser's
//! [`Token`] model. Line and column are 1-based and counted in characters,
//! tracked over the source text alongside the lexed tokens.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::token::{Token, TokenKind, TokenSubKind};

#[lachs::token]
pub enum RawToken {
    #[literal(r"[0-9]+(\.[0-9]+)?")]
    Float,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("*")]
    Star,
    #[terminal("/")]
    Slash,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to lex input: {0}")]
pub struct LexError(pub String);

impl RawToken {
    fn classify(&self) -> (String, TokenKind, TokenSubKind) {
        match self {
            RawToken::Float(inner) => (inner.value.clone(), TokenKind::Literal, TokenSubKind::Float),
            RawToken::Plus(_) => ("+".into(), TokenKind::Operator, TokenSubKind::Plus),
            RawToken::Minus(_) => ("-".into(), TokenKind::Operator, TokenSubKind::Minus),
            RawToken::Star(_) => ("*".into(), TokenKind::Operator, TokenSubKind::Multiply),
            RawToken::Slash(_) => ("/".into(), TokenKind::Operator, TokenSubKind::Divide),
            RawToken::LParen(_) => ("(".into(), TokenKind::Parenthesis, TokenSubKind::Left),
            RawToken::RParen(_) => (")".into(), TokenKind::Parenthesis, TokenSubKind::Right),
        }
    }
}

/// Walks the source in step with the lexed tokens to recover positions
struct Locator<'a> {
    rest: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Locator<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            rest: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Skip whitespace, then step over `content`; returns where it started
    fn locate(&mut self, content: &str) -> (usize, usize) {
        while let Some(c) = self.rest.next_if(|c| c.is_whitespace()) {
            self.bump(c);
        }

        let start = (self.line, self.column);
        for c in content.chars() {
            self.rest.next();
            self.bump(c);
        }
        start
    }
}

pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let raw = RawToken::lex(input).map_err(|err| LexError(err.to_string()))?;
    tracing::debug!(count = raw.len(), "lexed source");

    let mut locator = Locator::new(input);
    let tokens = raw
        .iter()
        .map(|raw| {
            let (content, kind, subkind) = raw.classify();
            let (line, column) = locator.locate(&content);
            Token::new(content, kind, subkind).at(line, column)
        })
        .collect();
    Ok(tokens)
}
