//! The emit surface shared by loggers and channels

use super::context::Context;
use super::severity::Severity;

/// Everything a caller can do to emit records.
///
/// `Logger` and `Channel` both implement it, so code can take `&dyn Log`
/// and stay unaware of whether it writes to a logger or to one of its
/// channels. The per-severity methods are thin wrappers around `log`, and
/// `warn`, `err`, `crit` and `emerg` are short aliases for four of them.
pub trait Log: Send + Sync {
    /// Logger or channel name
    fn name(&self) -> &str;

    /// Dispatch one record.
    ///
    /// An empty `message` stands for "no message": the record is still
    /// dispatched, carrying only its level and context.
    fn log(&self, level: Severity, message: &str, context: Context);

    /// True when at least one attached handler accepts `level`
    fn is_handling(&self, level: Severity) -> bool;

    #[inline]
    fn debug(&self, message: &str, context: Context) {
        self.log(Severity::Debug, message, context);
    }

    #[inline]
    fn info(&self, message: &str, context: Context) {
        self.log(Severity::Info, message, context);
    }

    #[inline]
    fn notice(&self, message: &str, context: Context) {
        self.log(Severity::Notice, message, context);
    }

    #[inline]
    fn warning(&self, message: &str, context: Context) {
        self.log(Severity::Warning, message, context);
    }

    #[inline]
    fn error(&self, message: &str, context: Context) {
        self.log(Severity::Error, message, context);
    }

    #[inline]
    fn critical(&self, message: &str, context: Context) {
        self.log(Severity::Critical, message, context);
    }

    #[inline]
    fn alert(&self, message: &str, context: Context) {
        self.log(Severity::Alert, message, context);
    }

    #[inline]
    fn emergency(&self, message: &str, context: Context) {
        self.log(Severity::Emergency, message, context);
    }

    #[inline]
    fn warn(&self, message: &str, context: Context) {
        self.warning(message, context);
    }

    #[inline]
    fn err(&self, message: &str, context: Context) {
        self.error(message, context);
    }

    #[inline]
    fn crit(&self, message: &str, context: Context) {
        self.critical(message, context);
    }

    #[inline]
    fn emerg(&self, message: &str, context: Context) {
        self.emergency(message, context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HandlerEntry, Logger};
    use crate::handlers::{MemoryBuffer, MemorySink, SinkHandler};

    fn capturing_logger() -> (Logger, MemoryBuffer) {
        let buffer = MemoryBuffer::new();
        let logger = Logger::new("app");
        logger
            .push_handler(HandlerEntry::from_handler(SinkHandler::new(
                MemorySink::with_buffer(buffer.clone()),
            )))
            .unwrap();
        logger.freeze();
        (logger, buffer)
    }

    #[test]
    fn test_short_aliases_match_full_names() {
        let (logger, buffer) = capturing_logger();
        let channel = logger.channel("billing");
        let log: &dyn Log = &channel;

        log.warn("w", Context::new());
        log.err("e", Context::new());
        log.crit("c", Context::new());
        log.emerg("x", Context::new());

        let levels: Vec<Severity> = buffer.records().iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            vec![
                Severity::Warning,
                Severity::Error,
                Severity::Critical,
                Severity::Emergency
            ]
        );
        assert!(buffer
            .records()
            .iter()
            .all(|r| r.channel.as_deref() == Some("billing")));
    }

    #[test]
    fn test_empty_message_still_dispatched() {
        let (logger, buffer) = capturing_logger();
        logger.notice("", Context::new().with_field("event", "heartbeat"));

        let records = buffer.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "");
        assert_eq!(records[0].level, Severity::Notice);
        assert!(buffer.lines()[0].contains("app.NOTICE:  event=heartbeat"));
    }
}
