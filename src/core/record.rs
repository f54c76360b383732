//! Log record structure

use super::context::Context;
use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

/// Snapshot of an error attached to a record
///
/// Errors are captured as text when the record is created so the record
/// stays `Clone + Send` and can be handed to any number of handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorReport {
    pub type_name: String,
    pub message: String,
    /// Messages of `source()` errors, outermost first
    pub chain: Vec<String>,
}

impl ErrorReport {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            chain: Vec::new(),
        }
    }

    /// Capture an error and its source chain
    pub fn capture<E: StdError + ?Sized>(error: &E) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(inner) = source {
            chain.push(inner.to_string());
            source = inner.source();
        }
        Self {
            type_name: std::any::type_name::<E>().to_string(),
            message: error.to_string(),
            chain,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.chain.push(cause.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub level: Severity,
    pub message: String,
    pub context: Context,
    /// Channel tag; `None` for records emitted on a top-level logger
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Name of the logger that dispatched the record
    pub logger: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<ErrorReport>,
}

impl Record {
    pub fn new(level: Severity, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: message.as_ref().to_string(),
            context: Context::new(),
            channel: None,
            logger: String::new(),
            timestamp: Utc::now(),
            exception: None,
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = logger.into();
        self
    }

    pub fn with_exception(mut self, exception: ErrorReport) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Channel tag if set, otherwise the dispatching logger's name
    pub fn channel_or_logger(&self) -> &str {
        self.channel.as_deref().unwrap_or(&self.logger)
    }
}
