use serde::{Deserialize, Serialize};

use crate::parser::Span;

/// Non-fatal notice about a question, positioned like a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub message: String,
    pub start: usize,
    pub end: usize,
}

impl Warning {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), start: span.start, end: span.end }
    }
}
