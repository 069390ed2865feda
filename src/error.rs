use thiserror::Error;

use crate::parser::ParseError;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    // Question errors, positioned
    #[error("{}", .0.message)]
    Parse(#[from] ParseError),

    // Evaluation errors, no position
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Unsupported aggregation '{0}'")]
    UnsupportedAggregate(String),

    #[error("Invalid plan: {0}")]
    Plan(String),

    // Collaborators
    #[error("Inventory unavailable: {0}")]
    Inventory(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Start offset for question errors; `None` for everything else.
    pub fn position(&self) -> Option<usize> {
        match self {
            EngineError::Parse(err) => Some(err.start),
            _ => None,
        }
    }

    /// Whether the error comes from the question itself rather than from
    /// the inventory, the saved registry or the filesystem.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            EngineError::Parse(_) | EngineError::UnknownColumn(_) | EngineError::UnsupportedAggregate(_)
        )
    }
}
