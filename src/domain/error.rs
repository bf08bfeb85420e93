//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree's structural rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("parent node not found: {0}")]
    ParentNotFound(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("malformed tree: {message}")]
    MalformedTree { message: String },
}

impl DomainError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedTree {
            message: message.into(),
        }
    }
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
