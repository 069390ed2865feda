use std::fmt::Display;

use serde::Serialize;

use crate::parser::{QueryParser, Span};

/// What went wrong, independent of the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// Missing `get`, missing `from` or empty scope.
    MalformedQuery,
    /// Tail text that matches no clause grammar.
    UnsupportedClause,
    /// A label that is not in the field catalog.
    UnknownField,
    /// Limit that is not a non-negative integer.
    InvalidLimit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl ParseError {
    /// Error spanning from `pivot` to the cursor.
    pub fn new(kind: ParseErrorKind, message: &str, pivot: usize, parser: &QueryParser) -> Self {
        Self::at(kind, message, Span::new(pivot, parser.position), parser)
    }

    pub fn at(kind: ParseErrorKind, message: &str, span: Span, parser: &QueryParser) -> Self {
        Self {
            kind,
            message: message.to_string(),
            text: parser.text_from_span(span),
            start: span.start,
            end: span.end,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn err<T>(self) -> Result<T, ParseError> {
        Err(self)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParseError: {}\n  at [{}:{}] -> '{}'", self.message, self.start, self.end, self.text)
    }
}

impl std::error::Error for ParseError {}
