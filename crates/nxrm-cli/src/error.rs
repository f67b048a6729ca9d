//! CLI error types with exit code handling
//!
//! Every library error is mapped to a [`CliError`] so that miette can render
//! it with a help line, and every [`CliError`] maps to an exit code.

use miette::Diagnostic;
use nxrm_client::NexusError;
use thiserror::Error;

use crate::exit_codes;

const VERBOSE_HELP: &str = "Re-run with --verbose to dump the HTTP requests and responses";

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Invalid input, rejected before any request
    #[error("{message}")]
    #[diagnostic(code(nxrm::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A resource required by the operation does not exist
    #[error("{message}")]
    #[diagnostic(code(nxrm::cli::not_found))]
    NotFound { message: String },

    /// The server answered with something unexpected, or could not be reached
    #[error("{message}")]
    #[diagnostic(code(nxrm::cli::server))]
    Server {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Connection details missing or unreadable
    #[error("{message}")]
    #[diagnostic(
        code(nxrm::cli::config),
        help("Run `nxrm configure` to set the server URL and credentials")
    )]
    Config { message: String },

    /// IO error (script sources, config file, prompts)
    #[error("IO error: {message}")]
    #[diagnostic(code(nxrm::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. }
            | CliError::NotFound { .. }
            | CliError::Server { .. }
            | CliError::Config { .. }
            | CliError::Io { .. } => exit_codes::ERROR,
        }
    }

    /// Create an input error (user provided invalid input)
    pub fn input(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }
}

impl From<NexusError> for CliError {
    fn from(err: NexusError) -> Self {
        let message = err.to_string();
        match err {
            NexusError::ConfigMissing
            | NexusError::InvalidConfig { .. }
            | NexusError::InvalidServerUrl { .. } => CliError::Config { message },
            NexusError::Io(_) | NexusError::ScriptSource { .. } => CliError::Io { message },
            ref e if e.is_validation() || matches!(e, NexusError::NotAGroup { .. }) => {
                CliError::Validation {
                    message,
                    help: None,
                }
            }
            ref e if e.is_not_found() => CliError::NotFound { message },
            ref e => CliError::Server {
                message,
                help: e.wants_verbose().then(|| VERBOSE_HELP.to_string()),
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
