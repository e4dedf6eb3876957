//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),

    /// Input was read but failed validation.
    #[error("{0}")]
    InvalidData(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::InvalidData(_) => crate::exitcode::DATAERR,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Domain(DomainError::InvalidHierarchy { .. })
                | ApplicationError::Domain(DomainError::NotAnArray(_))
                | ApplicationError::Parse { .. } => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exitcode;

    #[test]
    fn given_invalid_data_when_mapping_exit_code_then_dataerr() {
        assert_eq!(
            CliError::InvalidData("cycle".into()).exit_code(),
            exitcode::DATAERR
        );
    }

    #[test]
    fn given_usage_error_when_mapping_exit_code_then_usage() {
        assert_eq!(
            CliError::Usage("config file already exists".into()).exit_code(),
            exitcode::USAGE
        );
    }

    #[test]
    fn given_missing_input_when_mapping_exit_code_then_noinput() {
        let err = CliError::from(ApplicationError::OperationFailed {
            context: "read missing.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into(),
        });
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_non_array_input_when_mapping_exit_code_then_dataerr() {
        let err = CliError::from(ApplicationError::from(DomainError::NotAnArray("a number")));
        assert_eq!(err.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn given_config_error_when_mapping_exit_code_then_config() {
        let err = CliError::from(ApplicationError::Config {
            message: "bad toml".into(),
        });
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }
}
