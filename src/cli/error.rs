//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::{InfraError, StoreError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::MapNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::MapAlreadyExists(_) => crate::exitcode::CANTCREAT,
                    ApplicationError::Domain(DomainError::MalformedTree { .. }) => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::Domain(_) => crate::exitcode::USAGE,
                    ApplicationError::Store(StoreError::InvalidId(_)) => crate::exitcode::USAGE,
                    ApplicationError::Store(_) => crate::exitcode::IOERR,
                    ApplicationError::Feed(_) => crate::exitcode::UNAVAILABLE,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CliError::InvalidArgs("x".into()), crate::exitcode::USAGE)]
    #[case(ApplicationError::MapNotFound("1".into()).into(), crate::exitcode::NOINPUT)]
    #[case(
        ApplicationError::from(DomainError::malformed("two roots")).into(),
        crate::exitcode::DATAERR
    )]
    #[case(
        ApplicationError::from(DomainError::ParentNotFound("9".into())).into(),
        crate::exitcode::USAGE
    )]
    #[case(
        ApplicationError::from(StoreError::InvalidId("my map".into())).into(),
        crate::exitcode::USAGE
    )]
    #[case(ApplicationError::from(StoreError::Poisoned).into(), crate::exitcode::IOERR)]
    fn given_error_when_exit_code_then_maps_to_sysexits(#[case] err: CliError, #[case] code: i32) {
        assert_eq!(err.exit_code(), code);
    }
}
