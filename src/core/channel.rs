//! Channel sub-loggers

use super::{
    context::Context,
    error::Result,
    handler::HandlerEntry,
    log::Log,
    logger::Logger,
    processor::ProcessorEntry,
    record::ErrorReport,
    severity::Severity,
};
use std::error::Error as StdError;

/// Context key carrying the channel name
pub const CHANNEL_KEY: &str = "channel";

/// A named view over a [`Logger`].
///
/// A channel owns no handlers or processors. Every record emitted through it
/// gets `channel = <name>` in its context (replacing any value the caller
/// supplied) and is then dispatched by the parent. Handler and processor
/// operations act on the parent.
#[derive(Debug, Clone)]
pub struct Channel {
    name: String,
    parent: Logger,
}

impl Channel {
    pub fn new(name: impl Into<String>, parent: Logger) -> Self {
        Self {
            name: name.into(),
            parent,
        }
    }

    pub fn parent(&self) -> &Logger {
        &self.parent
    }

    /// A sibling channel on the same parent
    pub fn channel(&self, name: impl Into<String>) -> Channel {
        self.parent.channel(name)
    }

    pub fn push_handler(&self, entry: HandlerEntry) -> Result<()> {
        self.parent.push_handler(entry)
    }

    pub fn pop_handler(&self) -> Result<Option<HandlerEntry>> {
        self.parent.pop_handler()
    }

    pub fn handlers(&self) -> Vec<HandlerEntry> {
        self.parent.handlers()
    }

    pub fn push_processor(&self, entry: ProcessorEntry) -> Result<()> {
        self.parent.push_processor(entry)
    }

    pub fn pop_processor(&self) -> Result<Option<ProcessorEntry>> {
        self.parent.pop_processor()
    }

    pub fn processors(&self) -> Vec<ProcessorEntry> {
        self.parent.processors()
    }

    pub fn log_exception(
        &self,
        level: Severity,
        message: &str,
        error: &(dyn StdError + 'static),
        context: Context,
    ) {
        self.parent.dispatch(
            level,
            message,
            self.tag(context),
            Some(&self.name),
            Some(ErrorReport::capture(error)),
        );
    }

    fn tag(&self, mut context: Context) -> Context {
        context.insert(CHANNEL_KEY, self.name.as_str());
        context
    }
}

impl Log for Channel {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, level: Severity, message: &str, context: Context) {
        self.parent
            .dispatch(level, message, self.tag(context), Some(&self.name), None);
    }

    fn is_handling(&self, level: Severity) -> bool {
        self.parent.is_handling(level)
    }
}
