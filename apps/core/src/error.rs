use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors (config files, stdin).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents data validation errors (e.g., a triage threshold out of range).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., unreadable config file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pattern with the same id is already registered in the library.
    #[error("Duplicate pattern id: {0}")]
    DuplicatePattern(String),
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::DuplicatePattern(s) => AppError::DuplicatePattern(s.clone()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

/// Fault raised from inside a single pattern's `apply`.
///
/// The optimizer recovers from these locally: the pattern is recorded as not applied
/// and the pipeline continues with the last known good prompt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern hit a state it does not know how to render.
    #[error("pattern '{id}' failed: {reason}")]
    Failed { id: String, reason: String },
}

impl PatternError {
    pub fn failed(id: &str, reason: impl Into<String>) -> Self {
        PatternError::Failed {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
