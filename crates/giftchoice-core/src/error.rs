use thiserror::Error;

/// Errors raised when parsing wire values into core types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("unknown suggestion: {0}")]
    UnknownSuggestion(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
