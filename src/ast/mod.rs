//! Abstract syntax tree for arithmetic expressions
//!
//! Trees are built bottom-up by the grammar and never mutated afterwards.
//! [`Ast::compile`] produces the structured value handed to consumers,
//! [`Ast::render`] (and `Display`) a fully parenthesised infix dump.

use std::fmt::{self, Display};

use serde_json::{Value, json};

use crate::token::{TokenKind, TokenSubKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Number(Number),
    UnaryOperator(UnaryOperator),
    BinaryOperator(BinaryOperator),
}

/// Literal leaf. The raw lexical text is kept, never converted to a float.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Number {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryOperator {
    pub op: UnaryOpKind,
    pub operand: Box<Ast>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOperator {
    pub op: BinOpKind,
    pub lhs: Box<Ast>,
    pub rhs: Box<Ast>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    Negate,
}

impl UnaryOpKind {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOpKind::Negate => "negate",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOpKind::Negate => "-",
        }
    }

    pub fn from_token(kind: TokenKind, subkind: TokenSubKind) -> Option<Self> {
        match (kind, subkind) {
            (TokenKind::Operator, TokenSubKind::Minus) => Some(UnaryOpKind::Negate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    Plus,
    Subtract,
    Multiplication,
    Division,
}

impl BinOpKind {
    pub fn name(self) -> &'static str {
        match self {
            BinOpKind::Plus => "plus",
            BinOpKind::Subtract => "subtract",
            BinOpKind::Multiplication => "multiplication",
            BinOpKind::Division => "division",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOpKind::Plus => "+",
            BinOpKind::Subtract => "-",
            BinOpKind::Multiplication => "*",
            BinOpKind::Division => "/",
        }
    }

    /// Operator node produced by a matched token
    pub fn from_token(kind: TokenKind, subkind: TokenSubKind) -> Option<Self> {
        match (kind, subkind) {
            (TokenKind::Operator, TokenSubKind::Plus) => Some(BinOpKind::Plus),
            (TokenKind::Operator, TokenSubKind::Minus) => Some(BinOpKind::Subtract),
            (TokenKind::Operator, TokenSubKind::Multiply) => Some(BinOpKind::Multiplication),
            (TokenKind::Operator, TokenSubKind::Divide) => Some(BinOpKind::Division),
            _ => None,
        }
    }
}

impl Ast {
    pub fn number(value: impl Into<String>) -> Self {
        Ast::Number(Number {
            value: value.into(),
        })
    }

    pub fn unary(op: UnaryOpKind, operand: Ast) -> Self {
        Ast::UnaryOperator(UnaryOperator {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn negate(operand: Ast) -> Self {
        Ast::unary(UnaryOpKind::Negate, operand)
    }

    pub fn binary(op: BinOpKind, lhs: Ast, rhs: Ast) -> Self {
        Ast::BinaryOperator(BinaryOperator {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Discriminator written to the `"type"` field by [`Ast::compile`]
    pub fn type_name(&self) -> String {
        match self {
            Ast::Number(_) => "literal.float".to_string(),
            Ast::UnaryOperator(unary) => format!("operator.{}", unary.op.name()),
            Ast::BinaryOperator(binary) => format!("operator.{}", binary.op.name()),
        }
    }

    pub fn compile(&self) -> Value {
        match self {
            Ast::Number(number) => json!({
                "type": self.type_name(),
                "value": number.value,
            }),
            Ast::UnaryOperator(unary) => json!({
                "type": self.type_name(),
                "operand": unary.operand.compile(),
            }),
            Ast::BinaryOperator(binary) => json!({
                "type": self.type_name(),
                "lhs": binary.lhs.compile(),
                "rhs": binary.rhs.compile(),
            }),
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        match self {
            Ast::Number(_) => 1,
            Ast::UnaryOperator(unary) => 1 + unary.operand.size(),
            Ast::BinaryOperator(binary) => 1 + binary.lhs.size() + binary.rhs.size(),
        }
    }
}

impl Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Number(number) => f.write_str(&number.value),
            Ast::UnaryOperator(unary) => write!(f, "{}{}", unary.op.symbol(), unary.operand),
            Ast::BinaryOperator(binary) => write!(
                f,
                "({} {} {})",
                binary.lhs,
                binary.op.symbol(),
                binary.rhs
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_parenthesises_binary_only() {
        let ast = Ast::binary(
            BinOpKind::Plus,
            Ast::negate(Ast::number("1")),
            Ast::binary(BinOpKind::Division, Ast::number("2"), Ast::number("3")),
        );
        assert_eq!(ast.render(), "(-1 + (2 / 3))");
    }

    #[test]
    fn operator_mapping_is_keyed_on_token_kind() {
        assert_eq!(
            BinOpKind::from_token(TokenKind::Operator, TokenSubKind::Minus),
            Some(BinOpKind::Subtract)
        );
        assert_eq!(
            BinOpKind::from_token(TokenKind::Parenthesis, TokenSubKind::Left),
            None
        );
        assert_eq!(
            UnaryOpKind::from_token(TokenKind::Operator, TokenSubKind::Plus),
            None
        );
    }

    #[test]
    fn size_counts_every_node() {
        let ast = Ast::negate(Ast::binary(
            BinOpKind::Plus,
            Ast::number("1"),
            Ast::number("2"),
        ));
        assert_eq!(ast.size(), 4);
    }
}
