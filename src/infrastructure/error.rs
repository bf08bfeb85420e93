//! Infrastructure-level errors

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Faults raised by a roadmap store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid record {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode record {id}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid record id: {0:?}")]
    InvalidId(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Faults raised by a feed source.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("feed request for '{topic}' failed")]
    Http {
        topic: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("feed client setup failed")]
    Client(#[source] reqwest::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
