use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What went wrong while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    /// `expect_peek` saw a different token than required.
    UnexpectedToken,
    /// No prefix rule exists for the current token.
    NoPrefixRule,
    /// An INT token whose text is not a valid 64-bit integer.
    InvalidInteger,
    /// Expression nesting exceeded the parser's depth bound.
    NestingTooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken => write!(f, "unexpected token"),
            Self::NoPrefixRule => write!(f, "no prefix rule"),
            Self::InvalidInteger => write!(f, "invalid integer"),
            Self::NestingTooDeep => write!(f, "nesting too deep"),
        }
    }
}

/// A single parse error.
///
/// `Display` yields only the message: the REPL prints messages verbatim,
/// and callers that want a location use `span`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
}

impl ParseError {
    /// Create a new error.
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

/// Every error collected during one parse, in the order encountered.
///
/// The parser never stops at the first error, so this can hold several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseErrors {
    pub errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Create an empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    /// The bare messages, for display.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
