use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{BitAnd, BitOr, Mul, Shr, Sub};
use std::rc::{Rc, Weak};

use crate::token::{Token, TokenKind, TokenSubKind, symbol};

use super::state::{END_OF_STREAM, ParseError, ParseResult, Parser, TokenStream};

type ParserFn<T> = Rc<dyn Fn(&mut TokenStream) -> ParseResult<T>>;

/// Shared, type-erased parser; cloning only bumps a reference count
pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |stream: &mut TokenStream| parser.parse(stream)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, stream: &mut TokenStream) -> ParseResult<T> {
        (self.parser)(stream)
    }
}

/// Result of a heterogeneous choice, see [`BoxedParser::either`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Either<A, B> {
    Left(A),
    Right(B),
}

impl<T> Either<T, T> {
    pub fn into_inner(self) -> T {
        match self {
            Either::Left(value) | Either::Right(value) => value,
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    /// Fallible transformation of the parsed value
    ///
    /// Every other mapping combinator is expressed through this one.
    pub fn and_then<U: 'static, F: Fn(T) -> ParseResult<U> + 'static>(
        self,
        f: F,
    ) -> BoxedParser<U> {
        BoxedParser::new(move |stream: &mut TokenStream| f(self.parse(stream)?))
    }

    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        self.and_then(move |value| Ok(f(value)))
    }

    /// `self` followed by `other`; the first failure ends the sequence
    pub fn seq<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |stream: &mut TokenStream| {
            let first = self.parse(stream)?;
            other.parse(stream).map(|second| (first, second))
        })
    }

    /// Sequence keeping only `self`'s value
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        self.seq(other).map(|(kept, _)| kept)
    }

    /// Sequence keeping only `other`'s value
    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        self.seq(other).map(|(_, kept)| kept)
    }

    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        join(self.either(other))
    }

    /// Try `self`, then `other` from the same position
    ///
    /// When both fail, the branch that got further into the stream decides
    /// the error and the cursor is left where it stopped. Branches failing at
    /// the same token have their expectations merged.
    pub fn either<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<Either<T, U>> {
        BoxedParser::new(move |stream: &mut TokenStream| {
            let (left, left_at) = match attempt_at(&self, stream) {
                Ok(value) => return Ok(Either::Left(value)),
                Err(failure) => failure,
            };
            let (right, right_at) = match attempt_at(&other, stream) {
                Ok(value) => return Ok(Either::Right(value)),
                Err(failure) => failure,
            };

            let (err, failed_at) = match left_at.cmp(&right_at) {
                Ordering::Greater => (left, left_at),
                Ordering::Less => (right, right_at),
                Ordering::Equal => (left.merge(right), left_at),
            };
            stream.restore(failed_at);
            Err(err)
        })
    }

    /// Replace any failure with `Expected([name])`
    pub fn label(self, name: &'static str) -> BoxedParser<T> {
        BoxedParser::new(move |stream: &mut TokenStream| {
            self.parse(stream)
                .map_err(|_| ParseError::expected(name))
        })
    }
}

impl<T: Debug + 'static> BoxedParser<T> {
    /// Record entry and outcome of this parser at trace level
    pub fn traced(self, name: &'static str) -> BoxedParser<T> {
        BoxedParser::new(move |stream: &mut TokenStream| {
            let span = tracing::trace_span!("rule", rule = name, position = stream.position());
            let _entered = span.enter();

            tracing::trace!("begin");
            let result = self.parse(stream);
            match &result {
                Ok(value) => tracing::trace!(?value, end = stream.position(), "succeeded"),
                Err(err) => tracing::trace!(%err, "failed"),
            }
            result
        })
    }
}

/// `a & b`, see [`BoxedParser::seq`]
impl<T: 'static, U: 'static> BitAnd<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn bitand(self, rhs: BoxedParser<U>) -> Self::Output {
        self.seq(rhs)
    }
}

/// `a - b`, see [`BoxedParser::skip`]
impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `a * b`, see [`BoxedParser::skip_left`]
impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip_left(rhs)
    }
}

/// `a | b`, see [`BoxedParser::either`] for how failures combine
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `a >> f`, see [`BoxedParser::map`]
impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

/// Run `parser`, rewinding on failure and reporting where it stopped
fn attempt_at<T>(
    parser: &BoxedParser<T>,
    stream: &mut TokenStream,
) -> Result<T, (ParseError, usize)> {
    let start = stream.position();
    parser.parse(stream).map_err(|err| {
        let failed_at = stream.position();
        stream.restore(start);
        (err, failed_at)
    })
}

fn attempt<T>(parser: &BoxedParser<T>, stream: &mut TokenStream) -> ParseResult<T> {
    attempt_at(parser, stream).map_err(|(err, _)| err)
}

/// Consume one token of the given kind and subkind
///
/// The cursor only moves on a match, so a failed `eat` never needs a rollback.
pub fn eat(kind: TokenKind, subkind: TokenSubKind) -> BoxedParser<Token> {
    BoxedParser::new(move |stream: &mut TokenStream| match stream.peek() {
        Some(token) if token.is(kind, subkind) => stream.advance().ok_or(ParseError::Generic),
        _ => Err(ParseError::expected(symbol(kind, subkind))),
    })
}

/// Succeeds without consuming only once every token has been consumed
pub fn end_of_stream() -> BoxedParser<()> {
    BoxedParser::new(|stream: &mut TokenStream| {
        if stream.is_end_of_stream() {
            Ok(())
        } else {
            Err(ParseError::expected(END_OF_STREAM))
        }
    })
}

/// Run the parser, rolling the cursor back if it fails
pub fn try_<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<T> {
    BoxedParser::new(move |stream: &mut TokenStream| attempt(&parser, stream))
}

/// Free-standing form of [`BoxedParser::map`]
pub fn map<T: 'static, U: 'static, F: Fn(T) -> U + 'static>(
    f: F,
    parser: BoxedParser<T>,
) -> BoxedParser<U> {
    parser.map(f)
}

/// Collapse a choice whose branches produce the same type
pub fn join<T: 'static>(parser: BoxedParser<Either<T, T>>) -> BoxedParser<T> {
    parser.map(Either::into_inner)
}

/// Parse zero or more occurrences
///
/// `parser` must consume input whenever it succeeds, otherwise this never
/// terminates.
pub fn many<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |stream: &mut TokenStream| {
        let mut results = Vec::new();
        while let Ok(item) = attempt(&parser, stream) {
            results.push(item);
        }
        Ok(results)
    })
}

/// Parse one or more occurrences
pub fn some<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<(T, Vec<T>)> {
    parser.clone() & many(parser)
}

/// Optional: parse zero or one
pub fn optional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    BoxedParser::new(move |stream: &mut TokenStream| Ok(attempt(&parser, stream).ok()))
}

// === Late-bound rules ===

/// A parser slot that can be referenced before its body exists
///
/// Grammars that recurse through themselves declare a rule, build their body
/// from [`Rule::handle`], then [`Rule::define`] it. Handles hold a weak
/// reference, so the rule must outlive every parse that goes through them.
pub struct Rule<T> {
    name: &'static str,
    slot: Rc<OnceCell<BoxedParser<T>>>,
}

impl<T: 'static> Rule<T> {
    pub fn declare(name: &'static str) -> Self {
        Rule {
            name,
            slot: Rc::new(OnceCell::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn handle(&self) -> BoxedParser<T> {
        let slot: Weak<OnceCell<BoxedParser<T>>> = Rc::downgrade(&self.slot);
        let name = self.name;

        BoxedParser::new(move |stream: &mut TokenStream| {
            let Some(slot) = slot.upgrade() else {
                tracing::warn!(rule = name, "rule dropped while still referenced");
                return Err(ParseError::Generic);
            };
            match slot.get() {
                Some(parser) => parser.parse(stream),
                None => {
                    tracing::warn!(rule = name, "rule used before being defined");
                    Err(ParseError::Generic)
                }
            }
        })
    }

    /// Assign the body; returns `false` if the rule already had one
    pub fn define(&self, body: BoxedParser<T>) -> bool {
        let defined = self.slot.set(body).is_ok();
        if !defined {
            tracing::warn!(rule = self.name, "rule defined twice, keeping the first body");
        }
        defined
    }

    pub fn is_defined(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<T> Parser<T> for Rule<T> {
    fn parse(&self, stream: &mut TokenStream) -> ParseResult<T> {
        match self.slot.get() {
            Some(parser) => parser.parse(stream),
            None => Err(ParseError::Generic),
        }
    }
}
