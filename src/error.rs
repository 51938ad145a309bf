use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain the word list. Fatal for the session.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },
    #[error("invalid identifier in dataset config: {0:?}")]
    InvalidIdentifier(String),
}

impl DatasetError {
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Unavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failure of a single page or search request. The session stays usable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query failed: {0}")]
    Execution(String),
}
