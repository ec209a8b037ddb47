//! Combinator-based recursive descent parser
//!
//! - `state`: the token cursor, the error type and the [`Parser`] trait
//! - `combinators`: reusable building blocks over [`TokenStream`]
//! - `grammar`: the arithmetic expression grammar and [`parse`]

mod combinators;
mod grammar;
mod state;

pub use combinators::*;
pub use grammar::*;
pub use state::*;
