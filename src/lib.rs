//! # exparse - arithmetic expression front-end
//!
//! `exparse` turns a flat sequence of arithmetic tokens (numbers, `+ - * /`
//! and parentheses) into a typed abstract syntax tree, or reports precisely
//! what the grammar expected where it failed.
//!
//! ## Pipeline
//!
//! ```text
//! JSON tokens / source text
//!     ↓
//! [token::json | lexer] → Vec<Token>
//!     ↓
//! [parser] → Ast
//!     ↓
//! [Ast::compile] → serde_json::Value
//! ```
//!
//! ## Key Design Decisions
//!
//! ### Combinator core
//! The parser is built from small [`parser::BoxedParser`] values combined
//! with methods and overloaded operators:
//!
//! - `a & b` sequences two parsers into a pair
//! - `a | b` tries `a`, then `b` from the same position
//! - `a - b` / `a * b` keep the left / right result of a sequence
//! - `a >> f` maps the result
//!
//! Backtracking restores an index into the token vector; tokens are never
//! copied for a rollback.
//!
//! ### Late-bound rules
//! The grammar is recursive (`term` contains `'(' expr ')'`), so rules are
//! declared as [`parser::Rule`] slots, referenced through handles, and
//! defined afterwards.
//!
//! ### Raw literals
//! Number nodes keep the literal text as written; conversion to a numeric
//! type is left to whoever consumes the compiled tree.
//!
//! ## Getting Started
//!
//! ```
//! use exparse::parser::parse;
//! use exparse::token::Token;
//!
//! let ast = parse(vec![Token::float("1"), Token::plus(), Token::float("2")]).unwrap();
//! assert_eq!(ast.render(), "(1 + 2)");
//! assert_eq!(ast.compile()["type"], "operator.plus");
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Ast;
pub use parser::{ParseError, ParseResult, parse};
pub use token::Token;
