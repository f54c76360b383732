//! # Channel Logger
//!
//! A named logger registry with priority-ordered handler and processor
//! pipelines, channel sub-loggers and a fallback handler policy.
//!
//! ## Features
//!
//! - **Priority Ordering**: Handlers and processors run in ascending priority, ties in registration order
//! - **Channels**: Lightweight sub-loggers that share their parent's pipeline
//! - **Failure Isolation**: A failing or panicking handler never stops the others
//! - **Fallback**: Loggers left without handlers write to `<log_dir>/<app>.log`
//! - **Configuration**: TOML definitions resolved once into frozen loggers
//!
//! ## Example
//!
//! ```
//! use channel_logger::prelude::*;
//! use channel_logger::handlers::{MemorySink, SinkHandler};
//!
//! let sink = MemorySink::new();
//! let buffer = sink.buffer().clone();
//!
//! let logger = Logger::new("app");
//! logger
//!     .push_handler(HandlerEntry::from_handler(SinkHandler::new(sink)))
//!     .unwrap();
//! logger.freeze();
//!
//! let jobs = logger.channel("jobs");
//! jobs.error("boom", Context::new().with_field("user", 7));
//!
//! let records = buffer.records();
//! assert_eq!(records[0].channel.as_deref(), Some("jobs"));
//! ```

pub mod core;
pub mod debug_screen;
pub mod formatters;
pub mod handlers;
pub mod macros;
pub mod processors;
pub mod registry;

pub mod prelude {
    pub use crate::core::{
        Channel, Context, ErrorReport, FieldValue, Formatter, Handler, HandlerEntry, Log, Logger,
        LoggerError, LoggerMetrics, Priority, Processor, ProcessorEntry, Record, Result, Severity,
        Sink,
    };
    pub use crate::registry::{LoggingConfig, Registry, RegistryBuilder};
}

pub use core::{
    sort_by_priority, Channel, Context, ErrorReport, FieldValue, FnProcessor, Formatter, Handler,
    HandlerEntry, Log, Logger, LoggerError, LoggerMetrics, Prioritized, Priority, Processor,
    ProcessorChain, ProcessorEntry, Record, Result, Severity, Sink, SinkFailureCallback,
    CHANNEL_KEY,
};
pub use debug_screen::{BlueScreenRenderer, DebugPage, DebugScreenAdapter, HtmlDebugPage};
pub use registry::{LoggingConfig, Registry, RegistryBuilder};
