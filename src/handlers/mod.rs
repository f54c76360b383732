//! Handler and sink implementations

pub mod fallback;
pub mod file;
pub mod memory;
#[cfg(feature = "network")]
pub mod network;
pub mod null;
pub mod sink_handler;
pub mod stream;

pub use fallback::{fallback_handler, fallback_path, FallbackPolicy, FALLBACK_HANDLER_ID};
pub use file::FileSink;
pub use memory::{MemoryBuffer, MemorySink};
#[cfg(feature = "network")]
pub use network::NetworkSink;
pub use null::NullSink;
pub use sink_handler::SinkHandler;
pub use stream::{StreamSink, StreamTarget};

pub use crate::core::{Handler, HandlerEntry, Sink};
