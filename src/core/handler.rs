//! Handler and sink traits

use super::error::{LoggerError, Result};
use super::formatter::Formatter;
use super::priority::Priority;
use super::processor::ProcessorEntry;
use super::record::Record;
use super::severity::Severity;
use std::fmt;
use std::sync::Arc;

/// A destination for finished records.
///
/// Handlers are shared between loggers and called concurrently, so any
/// mutable state (file handles, buffers, sockets) must be synchronised by the
/// handler itself.
pub trait Handler: Send + Sync {
    /// Whether this handler accepts records of `level`
    fn is_handling(&self, level: Severity) -> bool;

    fn handle(&self, record: &Record) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;

    /// Replace the formatter; only called while the registry is built
    fn set_formatter(&mut self, _formatter: Arc<dyn Formatter>) -> Result<()> {
        Err(LoggerError::unsupported(self.name(), "set_formatter"))
    }

    /// Append a private processor; only called while the registry is built
    fn push_processor(&mut self, _entry: ProcessorEntry) -> Result<()> {
        Err(LoggerError::unsupported(self.name(), "push_processor"))
    }
}

/// Raw output target behind a `SinkHandler`
pub trait Sink: Send + Sync {
    /// Persist one formatted record
    fn write(&self, record: &Record, formatted: &str) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// A handler attached to a logger
#[derive(Clone)]
pub struct HandlerEntry {
    pub id: String,
    pub priority: Priority,
    pub handler: Arc<dyn Handler>,
}

impl HandlerEntry {
    pub fn new(id: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        Self {
            id: id.into(),
            priority: Priority::DEFAULT,
            handler,
        }
    }

    /// Wrap a handler, using its name as the entry id
    pub fn from_handler<H: Handler + 'static>(handler: H) -> Self {
        let id = handler.name().to_string();
        Self::new(id, Arc::new(handler))
    }

    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("handler", &self.handler.name())
            .finish()
    }
}
