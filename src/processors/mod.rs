//! Processor implementations

pub mod debug_screen;
pub mod placeholders;
pub mod priority_channel;
pub mod process_id;
pub mod tag;
pub mod uid;

pub use debug_screen::{
    DebugScreenExceptionProcessor, DebugScreenUrlProcessor, DEBUG_SCREEN_KEY,
    DEBUG_SCREEN_URL_KEY,
};
pub use placeholders::PlaceholderProcessor;
pub use priority_channel::{PriorityChannelProcessor, PRIORITY_KEY};
pub use process_id::ProcessIdProcessor;
pub use tag::TagProcessor;
pub use uid::UidProcessor;

pub use crate::core::{FnProcessor, Processor, ProcessorChain, ProcessorEntry};
