use thiserror::Error;

/// Durable preference storage failures. These are logged by the store and
/// never surface from a store action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("preference storage is unavailable")]
    Unavailable,
    #[error("failed to read preference '{0}'")]
    Read(String),
    #[error("failed to write preference '{0}'")]
    Write(String),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid destination content: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("destination '{0}' is defined more than once")]
    DuplicateSlug(String),
}

/// A string that does not name any variant of a slug-style enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
