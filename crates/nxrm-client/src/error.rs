//! Error types for Nexus operations

use thiserror::Error;

/// Hint shown whenever the server answers with something we cannot interpret
pub const VERBOSE_HINT: &str =
    "There was an error calling the function. Set verbose flag for more information";

/// Nexus operation errors
#[derive(Debug, Error)]
pub enum NexusError {
    // ============ Validation Errors ============
    #[error("{message}")]
    Validation { message: String },

    #[error("{value:?} is not a valid repository format. Available repository formats are : {available}")]
    InvalidFormat { value: String, available: String },

    #[error("{url:?} is an invalid url. URL must begin with either http:// or https://")]
    InvalidRemoteUrl { url: String },

    #[error("{name:?} is not a group repository")]
    NotAGroup { name: String },

    // ============ Lookup Errors ============
    #[error("{kind} {name:?} was not found in nexus")]
    NotFound { kind: &'static str, name: String },

    #[error(
        "The script {name:?} was not found in nexus. Make sure you add the script to nexus before executing the script"
    )]
    ScriptNotFound { name: String },

    // ============ Server Errors ============
    #[error("{context} : {}", VERBOSE_HINT)]
    Server { context: String },

    #[error("Error {action} {kind} {name:?} : {}", VERBOSE_HINT)]
    OperationFailed {
        action: &'static str,
        kind: &'static str,
        name: String,
    },

    // ============ Network Errors ============
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Invalid server URL: {url} - {reason}")]
    InvalidServerUrl { url: String, reason: String },

    // ============ Decode Errors ============
    #[error("JSON Unmarshal Error in {context}: {message}")]
    Decode { context: String, message: String },

    #[error("JSON Marshal Error: {0}")]
    Encode(String),

    // ============ Configuration Errors ============
    #[error(
        "Server connection details are not set...First Run \"nxrm configure\" to set the connection details"
    )]
    ConfigMissing,

    #[error("Invalid connection configuration: {message}")]
    InvalidConfig { message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unable to read script source {path}: {source}")]
    ScriptSource {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for Nexus operations
pub type Result<T> = std::result::Result<T, NexusError>;

impl NexusError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        NexusError::Validation {
            message: message.into(),
        }
    }

    /// Create a server error for an unexpected status in `context`
    pub fn server(context: impl Into<String>) -> Self {
        NexusError::Server {
            context: context.into(),
        }
    }

    /// Create a decode error
    pub fn decode(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        NexusError::Decode {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Whether this error was raised before any request reached the server
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NexusError::Validation { .. }
                | NexusError::InvalidFormat { .. }
                | NexusError::InvalidRemoteUrl { .. }
        )
    }

    /// Whether this error reports a missing resource
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NexusError::NotFound { .. } | NexusError::ScriptNotFound { .. }
        )
    }

    /// Whether the verbose flag would reveal more about this failure
    pub fn wants_verbose(&self) -> bool {
        matches!(
            self,
            NexusError::Server { .. }
                | NexusError::OperationFailed { .. }
                | NexusError::Network { .. }
                | NexusError::Decode { .. }
        )
    }
}

impl From<reqwest::Error> for NexusError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NexusError::Timeout { seconds: 30 }
        } else if e.is_connect() {
            NexusError::Network {
                message: format!("Connection failed: {}", e),
            }
        } else {
            NexusError::Network {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for NexusError {
    fn from(e: serde_json::Error) -> Self {
        NexusError::Encode(e.to_string())
    }
}

impl From<url::ParseError> for NexusError {
    fn from(e: url::ParseError) -> Self {
        NexusError::InvalidServerUrl {
            url: String::new(),
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(NexusError::validation("name is a required parameter").is_validation());
        assert!(
            NexusError::InvalidRemoteUrl {
                url: "ftp://x".to_string()
            }
            .is_validation()
        );
        assert!(
            NexusError::NotFound {
                kind: "Repository",
                name: "lib".to_string()
            }
            .is_not_found()
        );
        assert!(NexusError::server("RunScript").wants_verbose());
        assert!(!NexusError::ConfigMissing.wants_verbose());
    }

    #[test]
    fn test_error_messages() {
        let err = NexusError::NotFound {
            kind: "Content selector",
            name: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "Content selector \"foo\" was not found in nexus");

        let err = NexusError::server("RunScript");
        assert!(err.to_string().starts_with("RunScript : There was an error"));
    }
}
