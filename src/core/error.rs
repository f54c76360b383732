//! Error types for the logger registry

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed configuration or an unresolvable reference
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Log directory is missing and could not be created
    #[error("Log dir '{}' cannot be created: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Operation not offered by a single-purpose component
    #[error("{component} does not support '{operation}'")]
    UnsupportedOperation { component: String, operation: String },

    /// A handler's sink failed to persist a record
    #[error("Handler '{handler}' failed: {message}")]
    SinkFailure { handler: String, message: String },

    /// Handler or processor list mutated after the registry was built
    #[error("Logger '{logger}' is frozen; handlers and processors can only change during the build phase")]
    Frozen { logger: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML configuration parse error
    #[error("Configuration parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a directory creation error
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::DirectoryCreation {
            path: path.into(),
            source,
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(component: impl Into<String>, operation: impl Into<String>) -> Self {
        LoggerError::UnsupportedOperation {
            component: component.into(),
            operation: operation.into(),
        }
    }

    /// Create a sink failure error
    pub fn sink_failure(handler: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkFailure {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create a frozen logger error
    pub fn frozen(logger: impl Into<String>) -> Self {
        LoggerError::Frozen {
            logger: logger.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// True for errors raised while building the registry
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidConfiguration { .. }
                | LoggerError::DirectoryCreation { .. }
                | LoggerError::TomlError(_)
        )
    }
}
