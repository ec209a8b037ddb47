//! JSON token ingestion
//!
//! Tokens arrive as an array of objects:
//!
//! ```json
//! [{ "content": "42", "type": "literal.float", "line": 1, "column": 1 }]
//! ```
//!
//! `type` is `<kind>.<subkind>`. `line` and `column` are optional, but when
//! present they must be non-negative integers. The first malformed token
//! aborts ingestion.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::{Token, TokenKind, TokenSubKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenParsingError {
    #[error("Root should be an array of tokens")]
    RootNotArray,

    #[error("Missing key '{0}'")]
    MissingKey(String),

    #[error("Mismatch type on key '{key}', got '{found}' but '{expected}' was expected")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("Token's type cannot be empty")]
    EmptyTokenType,

    #[error("{}", describe_unknown(.group, .expected, .found))]
    TokenTypeUnknown {
        /// Kind under which the subkind was looked up, empty for the kind itself
        group: String,
        expected: Vec<String>,
        found: String,
    },

    #[error("{} is unreachable ({position})", capitalize(.key))]
    UnreachablePosition { key: String, position: i64 },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

fn describe_unknown(group: &str, expected: &[String], found: &str) -> String {
    let mut message = if group.is_empty() {
        format!("Token's type '{found}'")
    } else {
        format!("Token's subtype '{found}' of '{group}'")
    };
    message.push_str(" is unknown. One of the following was expected:");
    for name in expected {
        message.push_str(&format!("\n\t- '{name}'"));
    }
    message
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(n) if n.is_u64() => "number unsigned",
        Value::Number(n) if n.is_i64() => "number integer",
        Value::Number(_) => "number float",
    }
}

fn parse_content(object: &Value) -> Result<String, TokenParsingError> {
    const KEY: &str = "content";

    match object.get(KEY) {
        None => Err(TokenParsingError::MissingKey(KEY.to_string())),
        Some(Value::String(content)) => Ok(content.clone()),
        Some(other) => Err(TokenParsingError::TypeMismatch {
            key: KEY.to_string(),
            expected: "string".to_string(),
            found: type_name(other).to_string(),
        }),
    }
}

fn parse_position(object: &Value, key: &str) -> Result<Option<usize>, TokenParsingError> {
    let Some(value) = object.get(key) else {
        return Ok(None);
    };

    if let Some(position) = value.as_u64() {
        return usize::try_from(position).map(Some).map_err(|_| {
            TokenParsingError::UnreachablePosition {
                key: key.to_string(),
                position: i64::try_from(position).unwrap_or(i64::MAX),
            }
        });
    }

    match value.as_i64() {
        Some(position) => Err(TokenParsingError::UnreachablePosition {
            key: key.to_string(),
            position,
        }),
        None => Err(TokenParsingError::TypeMismatch {
            key: key.to_string(),
            expected: "number integer".to_string(),
            found: type_name(value).to_string(),
        }),
    }
}

/// Resolve a dotted `kind.subkind` name
pub fn parse_type(name: &str) -> Result<(TokenKind, TokenSubKind), TokenParsingError> {
    if name.is_empty() {
        return Err(TokenParsingError::EmptyTokenType);
    }

    let mut parts = name.split('.');
    let kind_name = parts.next().unwrap_or_default();

    let kind = TokenKind::ALL
        .into_iter()
        .find(|kind| kind.name() == kind_name)
        .ok_or_else(|| TokenParsingError::TokenTypeUnknown {
            group: String::new(),
            expected: TokenKind::ALL.iter().map(|k| k.name().to_string()).collect(),
            found: kind_name.to_string(),
        })?;

    let subkind_name = parts.next().unwrap_or_default();
    let unknown_subkind = || TokenParsingError::TokenTypeUnknown {
        group: kind_name.to_string(),
        expected: kind.subkinds().iter().map(|s| s.name().to_string()).collect(),
        found: subkind_name.to_string(),
    };

    let subkind = kind
        .subkinds()
        .iter()
        .copied()
        .find(|subkind| subkind.name() == subkind_name)
        .ok_or_else(unknown_subkind)?;

    Ok((kind, subkind))
}

fn parse_kind(object: &Value) -> Result<(TokenKind, TokenSubKind), TokenParsingError> {
    const KEY: &str = "type";

    match object.get(KEY) {
        None => Err(TokenParsingError::MissingKey(KEY.to_string())),
        Some(Value::String(name)) => parse_type(name),
        Some(other) => Err(TokenParsingError::TypeMismatch {
            key: KEY.to_string(),
            expected: "string".to_string(),
            found: type_name(other).to_string(),
        }),
    }
}

pub fn parse_token(object: &Value) -> Result<Token, TokenParsingError> {
    let content = parse_content(object)?;
    let (kind, subkind) = parse_kind(object)?;
    let line = parse_position(object, "line")?;
    let column = parse_position(object, "column")?;

    Ok(Token {
        content,
        kind,
        subkind,
        line,
        column,
    })
}

pub fn parse_tokens(root: &Value) -> Result<Vec<Token>, TokenParsingError> {
    let Value::Array(items) = root else {
        return Err(TokenParsingError::RootNotArray);
    };

    let tokens = items
        .iter()
        .map(parse_token)
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(count = tokens.len(), "ingested tokens");
    Ok(tokens)
}

pub fn from_str(input: &str) -> Result<Vec<Token>, TokenParsingError> {
    let root: Value = serde_json::from_str(input)
        .map_err(|err| TokenParsingError::InvalidJson(err.to_string()))?;
    parse_tokens(&root)
}

#[derive(Serialize)]
struct WireToken<'a> {
    content: &'a str,
    #[serde(rename = "type")]
    symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<usize>,
}

/// Encode tokens in the same shape [`parse_tokens`] accepts
pub fn to_value(tokens: &[Token]) -> serde_json::Result<Value> {
    let wire: Vec<WireToken<'_>> = tokens
        .iter()
        .map(|token| WireToken {
            content: &token.content,
            symbol: token.symbol(),
            line: token.line,
            column: token.column,
        })
        .collect();

    serde_json::to_value(wire)
}
