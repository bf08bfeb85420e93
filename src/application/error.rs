//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::{FeedError, StoreError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("roadmap not found: {0}")]
    MapNotFound(String),

    #[error("roadmap already exists: {0}")]
    MapAlreadyExists(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
