//! Core record model and pipeline types

pub mod channel;
pub mod context;
pub mod error;
pub mod formatter;
pub mod handler;
pub mod log;
pub mod logger;
pub mod metrics;
pub mod priority;
pub mod processor;
pub mod record;
pub mod severity;

pub use channel::{Channel, CHANNEL_KEY};
pub use context::{Context, FieldValue};
pub use error::{LoggerError, Result};
pub use formatter::Formatter;
pub use handler::{Handler, HandlerEntry, Sink};
pub use log::Log;
pub use logger::{Logger, SinkFailureCallback};
pub use metrics::LoggerMetrics;
pub use priority::{sort_by_priority, Prioritized, Priority};
pub use processor::{FnProcessor, Processor, ProcessorChain, ProcessorEntry};
pub use record::{ErrorReport, Record};
pub use severity::Severity;
