//! Configuration-driven logger registry
//!
//! [`LoggingConfig`] describes formatters, processors, handlers and named
//! loggers. [`RegistryBuilder`] resolves those definitions through a
//! [`Catalog`], attaches them to loggers in ascending priority, injects the
//! fallback handler where a logger ended up with none and freezes the result
//! into a [`Registry`].

pub mod builder;
pub mod catalog;
pub mod config;
#[allow(clippy::module_inception)]
pub mod registry;

pub use builder::{
    create_log_dir, RegistryBuilder, DEBUG_SCREEN_EXCEPTION_PRIORITY, DEBUG_SCREEN_URL_PRIORITY,
    PRIORITY_CHANNEL_PRIORITY,
};
pub use catalog::{Catalog, ComponentOptions, FormatterFactory, HandlerFactory, ProcessorFactory};
pub use config::{
    definition_priority, ComponentDef, ComponentSpec, HandlerDef, HandlerSpec, LoggerDef,
    LoggerSpec, LoggingConfig, OrderedMap, GLOBAL_LOGGER,
};
pub use registry::{LoggerInfo, Registry};
