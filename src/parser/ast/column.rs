use std::fmt;

use crate::{database::{Catalog, FieldDescriptor}, parser::{ParseError, ParseErrorKind, QueryParser, Span}};

/// A field label as the user wrote it, with its position in the question.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub label: String,
    pub span: Span,
}

impl ColumnRef {
    pub fn new(label: &str, span: Span) -> Self {
        Self { label: label.to_string(), span }
    }

    pub fn from_span(parser: &QueryParser, span: Span) -> Self {
        Self { label: parser.text_from_span(span), span }
    }

    /// Catalog lookup; `message` is the error text used when the label is unknown.
    pub fn resolve(&self, catalog: &Catalog, message: &str, parser: &QueryParser) -> Result<FieldDescriptor, ParseError> {
        match catalog.field(&self.label) {
            Some(desc) => Ok(*desc),
            None => ParseError::at(ParseErrorKind::UnknownField, message, self.span, parser).err(),
        }
    }
}

impl fmt::Debug for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}..{}", self.label, self.span.start, self.span.end)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
