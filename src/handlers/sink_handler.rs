//! Generic handler wrapping a sink

use crate::core::{
    Formatter, Handler, ProcessorChain, ProcessorEntry, Record, Result, Severity, Sink,
};
use crate::formatters::LineFormatter;
use std::sync::Arc;

/// Level filter, private processors and a formatter in front of a [`Sink`]
///
/// # Example
///
/// ```
/// use channel_logger::handlers::{MemoryBuffer, MemorySink, SinkHandler};
/// use channel_logger::prelude::*;
///
/// let buffer = MemoryBuffer::new();
/// let handler = SinkHandler::new(MemorySink::with_buffer(buffer.clone()))
///     .with_name("capture")
///     .with_min_level(Severity::Warning);
///
/// assert!(!handler.is_handling(Severity::Info));
/// assert!(handler.is_handling(Severity::Error));
/// ```
pub struct SinkHandler<S: Sink> {
    name: String,
    min_level: Severity,
    formatter: Arc<dyn Formatter>,
    processors: ProcessorChain,
    sink: S,
}

impl<S: Sink> SinkHandler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            name: sink.name().to_string(),
            min_level: Severity::Debug,
            formatter: Arc::new(LineFormatter::new()),
            processors: ProcessorChain::new(),
            sink,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, level: Severity) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_processor(mut self, entry: ProcessorEntry) -> Self {
        self.processors.push(entry);
        self
    }

    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn processors(&self) -> &ProcessorChain {
        &self.processors
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: Sink> Handler for SinkHandler<S> {
    fn is_handling(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    fn handle(&self, record: &Record) -> Result<()> {
        if self.processors.is_empty() {
            let formatted = self.formatter.format(record)?;
            return self.sink.write(record, &formatted);
        }

        let record = self.processors.apply(record.clone());
        let formatted = self.formatter.format(&record)?;
        self.sink.write(&record, &formatted)
    }

    fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_formatter(&mut self, formatter: Arc<dyn Formatter>) -> Result<()> {
        self.formatter = formatter;
        Ok(())
    }

    fn push_processor(&mut self, entry: ProcessorEntry) -> Result<()> {
        self.processors.push(entry);
        Ok(())
    }
}
