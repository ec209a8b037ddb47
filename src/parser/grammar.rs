//! Expression grammar, from lowest to highest precedence:
//!
//! ```text
//! expr   := factor (('+' | '-') factor)*
//! factor := term (('*' | '/') term)*
//! term   := '-' term | FLOAT | '(' expr ')'
//! ```
//!
//! Binary chains fold left to right, so `a - b - c` is `(a - b) - c`.

use crate::ast::{Ast, BinOpKind, UnaryOpKind};
use crate::token::{Token, TokenKind, TokenSubKind};

use super::combinators::{BoxedParser, Rule, eat, end_of_stream, many};
use super::state::{ParseError, ParseResult, Parser, TokenStream};

/// The three expression rules, wired together
///
/// `expr` and `term` are late-bound [`Rule`]s because `term` refers back to
/// `expr` through parentheses and to itself through negation.
pub struct Grammar {
    expr: Rule<Ast>,
    factor: BoxedParser<Ast>,
    term: Rule<Ast>,
}

impl Grammar {
    pub fn new() -> Self {
        let expr = Rule::declare("expr");
        let term = Rule::declare("term");

        let negation = (negation_operator() & term.handle())
            >> |(op, operand): (UnaryOpKind, Ast)| Ast::unary(op, operand);
        term.define((negation | number() | parenthesized(expr.handle())).traced("term"));

        let factor = binary_chain(
            term.handle(),
            binary_operator(TokenSubKind::Multiply, TokenSubKind::Divide),
        )
        .traced("factor");

        expr.define(
            binary_chain(
                factor.clone(),
                binary_operator(TokenSubKind::Plus, TokenSubKind::Minus),
            )
            .traced("expr"),
        );

        Grammar { expr, factor, term }
    }

    pub fn expr(&self) -> BoxedParser<Ast> {
        self.expr.handle()
    }

    pub fn factor(&self) -> BoxedParser<Ast> {
        self.factor.clone()
    }

    pub fn term(&self) -> BoxedParser<Ast> {
        self.term.handle()
    }

    /// Run `expr` over the whole stream, rejecting leftover tokens
    pub fn parse_stream(&self, stream: &mut TokenStream) -> ParseResult<Ast> {
        let ast = self.expr.parse(stream)?;
        end_of_stream().parse(stream)?;
        Ok(ast)
    }

    pub fn parse(&self, tokens: Vec<Token>) -> ParseResult<Ast> {
        let mut stream = TokenStream::new(tokens);
        tracing::debug!(tokens = stream.len(), "parsing expression");

        let result = self.parse_stream(&mut stream);
        match &result {
            Ok(ast) => tracing::debug!(nodes = ast.size(), "parsed expression"),
            Err(err) => tracing::debug!(
                %err,
                position = stream.position(),
                found = ?stream.peek().map(Token::describe),
                "failed to parse expression"
            ),
        }
        result
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a complete token sequence into a single expression tree
pub fn parse(tokens: Vec<Token>) -> ParseResult<Ast> {
    Grammar::new().parse(tokens)
}

/// FLOAT
fn number() -> BoxedParser<Ast> {
    eat(TokenKind::Literal, TokenSubKind::Float) >> |token: Token| Ast::number(token.content)
}

/// '(' expr ')'
fn parenthesized(expr: BoxedParser<Ast>) -> BoxedParser<Ast> {
    eat(TokenKind::Parenthesis, TokenSubKind::Left) * expr
        - eat(TokenKind::Parenthesis, TokenSubKind::Right)
}

/// '-'
fn negation_operator() -> BoxedParser<UnaryOpKind> {
    eat(TokenKind::Operator, TokenSubKind::Minus).and_then(|token: Token| {
        UnaryOpKind::from_token(token.kind, token.subkind)
            .ok_or_else(|| ParseError::UnknownToken(token.content))
    })
}

/// Either of two operator tokens, resolved to the node it builds
fn binary_operator(first: TokenSubKind, second: TokenSubKind) -> BoxedParser<BinOpKind> {
    (eat(TokenKind::Operator, first) | eat(TokenKind::Operator, second)).and_then(
        |token: Token| {
            BinOpKind::from_token(token.kind, token.subkind)
                .ok_or_else(|| ParseError::UnknownToken(token.content))
        },
    )
}

/// operand (operator operand)*
fn binary_chain(operand: BoxedParser<Ast>, operator: BoxedParser<BinOpKind>) -> BoxedParser<Ast> {
    (operand.clone() & many(operator & operand)) >> |(first, rest): (Ast, Vec<(BinOpKind, Ast)>)| {
        rest.into_iter()
            .fold(first, |lhs, (op, rhs)| Ast::binary(op, lhs, rhs))
    }
}
