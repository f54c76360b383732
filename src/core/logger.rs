//! Named logger with ordered handler and processor pipelines

use super::{
    channel::Channel,
    context::Context,
    error::{LoggerError, Result},
    handler::HandlerEntry,
    log::Log,
    metrics::LoggerMetrics,
    processor::{apply_all, ProcessorEntry},
    record::{ErrorReport, Record},
    severity::Severity,
};
use arc_swap::ArcSwap;
use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Callback invoked with the handler id and error whenever a handler fails
pub type SinkFailureCallback = Arc<dyn Fn(&str, &LoggerError) + Send + Sync>;

struct Shared {
    name: String,
    handlers: ArcSwap<Vec<HandlerEntry>>,
    processors: ArcSwap<Vec<ProcessorEntry>>,
    frozen: AtomicBool,
    metrics: LoggerMetrics,
    on_sink_failure: OnceLock<SinkFailureCallback>,
}

/// A named logger.
///
/// Cloning a `Logger` yields another handle to the same logger. Handlers and
/// processors run in attachment order: the entry pushed first runs first.
/// The lists are copy-on-write, so emitting never takes a lock; once
/// [`Logger::freeze`] is called they can no longer change.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

impl Logger {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                handlers: ArcSwap::from_pointee(Vec::new()),
                processors: ArcSwap::from_pointee(Vec::new()),
                frozen: AtomicBool::new(false),
                metrics: LoggerMetrics::new(),
                on_sink_failure: OnceLock::new(),
            }),
        }
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_frozen() {
            return Err(LoggerError::frozen(&self.shared.name));
        }
        Ok(())
    }

    /// Append a handler; it runs after every handler already attached
    pub fn push_handler(&self, entry: HandlerEntry) -> Result<()> {
        self.ensure_mutable()?;
        self.shared.handlers.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(entry.clone());
            next
        });
        Ok(())
    }

    /// Remove and return the most recently attached handler
    pub fn pop_handler(&self) -> Result<Option<HandlerEntry>> {
        self.ensure_mutable()?;
        let previous = self.shared.handlers.rcu(|current| {
            let mut next = Vec::clone(current);
            next.pop();
            next
        });
        Ok(previous.last().cloned())
    }

    /// Handlers in invocation order
    pub fn handlers(&self) -> Vec<HandlerEntry> {
        Vec::clone(&self.shared.handlers.load())
    }

    /// Append a processor; it runs after every processor already attached
    pub fn push_processor(&self, entry: ProcessorEntry) -> Result<()> {
        self.ensure_mutable()?;
        self.shared.processors.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(entry.clone());
            next
        });
        Ok(())
    }

    /// Remove and return the most recently attached processor
    pub fn pop_processor(&self) -> Result<Option<ProcessorEntry>> {
        self.ensure_mutable()?;
        let previous = self.shared.processors.rcu(|current| {
            let mut next = Vec::clone(current);
            next.pop();
            next
        });
        Ok(previous.last().cloned())
    }

    /// Processors in execution order
    pub fn processors(&self) -> Vec<ProcessorEntry> {
        Vec::clone(&self.shared.processors.load())
    }

    /// Install the failure callback; only possible before freezing, and once
    pub fn set_sink_failure_callback(&self, callback: SinkFailureCallback) -> Result<()> {
        self.ensure_mutable()?;
        self.shared
            .on_sink_failure
            .set(callback)
            .map_err(|_| LoggerError::config(&self.shared.name, "sink failure callback already set"))
    }

    /// Reject any further handler or processor changes
    pub fn freeze(&self) {
        self.shared.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.shared.frozen.load(Ordering::Acquire)
    }

    /// A delegate that tags every record with `name`
    pub fn channel(&self, name: impl Into<String>) -> Channel {
        Channel::new(name, self.clone())
    }

    /// Emit a record carrying a captured error
    pub fn log_exception(
        &self,
        level: Severity,
        message: &str,
        error: &(dyn StdError + 'static),
        context: Context,
    ) {
        self.dispatch(level, message, context, None, Some(ErrorReport::capture(error)));
    }

    /// Emit a record with an already captured error report
    pub fn log_report(&self, level: Severity, message: &str, report: ErrorReport, context: Context) {
        self.dispatch(level, message, context, None, Some(report));
    }

    /// Get the logger metrics for observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Flush every handler, returning the first error after trying all
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for entry in self.shared.handlers.load().iter() {
            if let Err(e) = entry.handler.flush() {
                eprintln!("[LOGGER ERROR] Handler '{}' flush failed: {}", entry.id, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub(crate) fn dispatch(
        &self,
        level: Severity,
        message: &str,
        context: Context,
        channel: Option<&str>,
        exception: Option<ErrorReport>,
    ) {
        let handlers = self.shared.handlers.load();
        if !handlers.iter().any(|entry| entry.handler.is_handling(level)) {
            self.shared.metrics.record_ignored();
            return;
        }

        let mut record = Record::new(level, message)
            .with_logger(&self.shared.name)
            .with_context(context);
        record.channel = channel.map(str::to_string);
        record.exception = exception;

        let record = apply_all(&self.shared.processors.load(), record);

        let mut delivered = false;
        for entry in handlers.iter() {
            if !entry.handler.is_handling(record.level) {
                continue;
            }
            delivered |= self.invoke(entry, &record);
        }

        if delivered {
            self.shared.metrics.record_handled();
        } else {
            self.shared.metrics.record_ignored();
        }
    }

    /// Call one handler with panic isolation
    ///
    /// A failing or panicking handler is reported and counted; the caller
    /// moves on to the next handler. Returns true on success.
    fn invoke(&self, entry: &HandlerEntry, record: &Record) -> bool {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            entry.handler.handle(record)
        }));

        match result {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                eprintln!(
                    "[LOGGER ERROR] Handler '{}' on logger '{}' failed: {}",
                    entry.id, self.shared.name, e
                );
                self.shared.metrics.record_sink_failure();
                self.notify_failure(&entry.id, &e);
                false
            }
            Err(panic_info) => {
                let panic_msg = panic_message(panic_info.as_ref());
                eprintln!(
                    "[LOGGER CRITICAL] Handler '{}' on logger '{}' panicked: {}. \
                     Other handlers continue to function.",
                    entry.id, self.shared.name, panic_msg
                );
                self.shared.metrics.record_handler_panic();
                let error = LoggerError::sink_failure(&entry.id, format!("panicked: {}", panic_msg));
                self.notify_failure(&entry.id, &error);
                false
            }
        }
    }

    fn notify_failure(&self, handler: &str, error: &LoggerError) {
        if let Some(callback) = self.shared.on_sink_failure.get() {
            callback(handler, error);
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Log for Logger {
    fn name(&self) -> &str {
        &self.shared.name
    }

    fn log(&self, level: Severity, message: &str, context: Context) {
        self.dispatch(level, message, context, None, None);
    }

    fn is_handling(&self, level: Severity) -> bool {
        self.shared
            .handlers
            .load()
            .iter()
            .any(|entry| entry.handler.is_handling(level))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.shared.name)
            .field("handlers", &self.shared.handlers.load().len())
            .field("processors", &self.shared.processors.load().len())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}
