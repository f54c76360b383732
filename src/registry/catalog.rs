//! Named component definitions and the factories that build them
//!
//! The catalog is the registry's service container. Factories are keyed by
//! class name; definitions bind a name to a class, options and a priority.
//! Instances are created on first use and cached, so a handler referenced by
//! several loggers is one shared object.

use super::config::{definition_priority, ComponentSpec, HandlerSpec};
use crate::core::{
    sort_by_priority, Formatter, Handler, HandlerEntry, LoggerError, Prioritized, Priority,
    Processor, ProcessorEntry, Result, Severity,
};
use crate::formatters::{JsonFormatter, LineFormatter, LogfmtFormatter, TimestampFormat};
use crate::handlers::{FileSink, NullSink, SinkHandler, StreamSink, StreamTarget};
use crate::processors::{
    PlaceholderProcessor, PriorityChannelProcessor, ProcessIdProcessor, TagProcessor,
    UidProcessor,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type HandlerFactory =
    Arc<dyn Fn(&ComponentOptions<'_>) -> Result<Box<dyn Handler>> + Send + Sync>;
pub type ProcessorFactory =
    Arc<dyn Fn(&ComponentOptions<'_>) -> Result<Arc<dyn Processor>> + Send + Sync>;
pub type FormatterFactory =
    Arc<dyn Fn(&ComponentOptions<'_>) -> Result<Arc<dyn Formatter>> + Send + Sync>;

/// Everything a factory gets to build one component
#[derive(Debug, Clone, Copy)]
pub struct ComponentOptions<'a> {
    /// Definition name
    pub name: &'a str,
    pub class: &'a str,
    pub options: &'a toml::Table,
    pub app_name: &'a str,
    pub log_dir: &'a Path,
    /// Handler minimum level; debug for other components
    pub level: Severity,
}

impl<'a> ComponentOptions<'a> {
    fn invalid(&self, message: impl Into<String>) -> LoggerError {
        LoggerError::config(format!("{} '{}'", self.class, self.name), message)
    }

    pub fn str_option(&self, key: &str) -> Result<Option<&'a str>> {
        match self.options.get(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.invalid(format!("option '{}' must be a string, got {}", key, other))),
        }
    }

    pub fn bool_option(&self, key: &str) -> Result<Option<bool>> {
        match self.options.get(key) {
            None => Ok(None),
            Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
            Some(other) => Err(self.invalid(format!("option '{}' must be a boolean, got {}", key, other))),
        }
    }

    pub fn int_option(&self, key: &str) -> Result<Option<i64>> {
        match self.options.get(key) {
            None => Ok(None),
            Some(toml::Value::Integer(i)) => Ok(Some(*i)),
            Some(other) => Err(self.invalid(format!("option '{}' must be an integer, got {}", key, other))),
        }
    }

    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        match self.options.get(key) {
            None => Ok(Vec::new()),
            Some(toml::Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => Ok(s.clone()),
                    other => Err(self.invalid(format!("option '{}' must list strings, got {}", key, other))),
                })
                .collect(),
            Some(other) => Err(self.invalid(format!("option '{}' must be an array, got {}", key, other))),
        }
    }

    /// Path option resolved against the log directory
    pub fn path_option(&self, key: &str) -> Result<Option<PathBuf>> {
        Ok(self.str_option(key)?.map(|path| self.log_dir.join(path)))
    }

    pub fn required_str(&self, key: &str) -> Result<&'a str> {
        self.str_option(key)?
            .ok_or_else(|| self.invalid(format!("missing required option '{}'", key)))
    }

    fn timestamp_format(&self) -> Result<TimestampFormat> {
        match self.str_option("timestamp_format")? {
            None => Ok(TimestampFormat::default()),
            Some(format) => format.parse().map_err(|e: String| self.invalid(e)),
        }
    }
}

struct HandlerDefinition {
    name: String,
    spec: HandlerSpec,
    priority: Priority,
    tagged: bool,
}

struct ComponentDefinition {
    name: String,
    spec: ComponentSpec,
    priority: Priority,
    tagged: bool,
}

/// Definitions, factories and instance cache
pub struct Catalog {
    app_name: String,
    log_dir: PathBuf,

    handler_factories: HashMap<String, HandlerFactory>,
    processor_factories: HashMap<String, ProcessorFactory>,
    formatter_factories: HashMap<String, FormatterFactory>,

    handlers: Vec<HandlerDefinition>,
    processors: Vec<ComponentDefinition>,
    formatters: Vec<ComponentDefinition>,

    handler_instances: HashMap<String, Arc<dyn Handler>>,
    processor_instances: HashMap<String, Arc<dyn Processor>>,
    formatter_instances: HashMap<String, Arc<dyn Formatter>>,
}

impl Catalog {
    /// Empty catalog without built-ins
    pub fn empty(app_name: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.into(),
            log_dir: log_dir.into(),
            handler_factories: HashMap::new(),
            processor_factories: HashMap::new(),
            formatter_factories: HashMap::new(),
            handlers: Vec::new(),
            processors: Vec::new(),
            formatters: Vec::new(),
            handler_instances: HashMap::new(),
            processor_instances: HashMap::new(),
            formatter_instances: HashMap::new(),
        }
    }

    /// Catalog with the built-in classes and untagged default definitions
    pub fn new(app_name: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        let mut catalog = Self::empty(app_name, log_dir);
        catalog.register_builtin_factories();
        catalog.register_builtin_definitions();
        catalog
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    fn register_builtin_factories(&mut self) {
        self.register_formatter_factory("line", formatter_fn(|opts| {
            let formatter = LineFormatter::new()
                .with_timestamp_format(opts.timestamp_format()?)
                .with_context(opts.bool_option("include_context")?.unwrap_or(true));
            Ok(Arc::new(formatter) as Arc<dyn Formatter>)
        }));
        self.register_formatter_factory("json", formatter_fn(|opts| {
            let formatter = if opts.bool_option("pretty")?.unwrap_or(false) {
                JsonFormatter::pretty()
            } else {
                JsonFormatter::new()
            };
            Ok(Arc::new(formatter) as Arc<dyn Formatter>)
        }));
        self.register_formatter_factory("logfmt", formatter_fn(|opts| {
            let formatter = LogfmtFormatter::new().with_timestamp_format(opts.timestamp_format()?);
            Ok(Arc::new(formatter) as Arc<dyn Formatter>)
        }));

        self.register_processor_factory("process_id", processor_fn(|_| {
            Ok(Arc::new(ProcessIdProcessor::new()) as Arc<dyn Processor>)
        }));
        self.register_processor_factory("uid", processor_fn(|opts| {
            let processor = match opts.int_option("length")? {
                None => UidProcessor::default(),
                Some(length) => UidProcessor::new(usize::try_from(length).unwrap_or(0))?,
            };
            Ok(Arc::new(processor) as Arc<dyn Processor>)
        }));
        self.register_processor_factory("tag", processor_fn(|opts| {
            Ok(Arc::new(TagProcessor::new(opts.string_list("tags")?)) as Arc<dyn Processor>)
        }));
        self.register_processor_factory("message_placeholders", processor_fn(|_| {
            Ok(Arc::new(PlaceholderProcessor::new()) as Arc<dyn Processor>)
        }));
        self.register_processor_factory("priority_channel", processor_fn(|_| {
            Ok(Arc::new(PriorityChannelProcessor::new()) as Arc<dyn Processor>)
        }));

        self.register_handler_factory("stream", handler_fn(|opts| {
            let target = match opts.str_option("stream")? {
                None => StreamTarget::Auto,
                Some(stream) => stream.parse().map_err(|e: String| opts.invalid(e))?,
            };
            let sink = StreamSink::new(target).with_colors(opts.bool_option("colors")?.unwrap_or(false));
            Ok(Box::new(SinkHandler::new(sink).with_name(opts.name).with_min_level(opts.level))
                as Box<dyn Handler>)
        }));
        self.register_handler_factory("file", handler_fn(|opts| {
            let path = opts
                .path_option("path")?
                .unwrap_or_else(|| opts.log_dir.join(format!("{}.log", opts.name)));
            let sink = FileSink::new(path)?;
            #[cfg(feature = "file")]
            let sink = sink.with_locking(opts.bool_option("locking")?.unwrap_or(false));
            Ok(Box::new(SinkHandler::new(sink).with_name(opts.name).with_min_level(opts.level))
                as Box<dyn Handler>)
        }));
        self.register_handler_factory("null", handler_fn(|opts| {
            Ok(Box::new(SinkHandler::new(NullSink).with_name(opts.name).with_min_level(opts.level))
                as Box<dyn Handler>)
        }));
        #[cfg(feature = "network")]
        self.register_handler_factory("network", handler_fn(|opts| {
            let sink = crate::handlers::NetworkSink::lazy(opts.required_str("address")?)
                .with_reconnect(opts.bool_option("reconnect")?.unwrap_or(true));
            Ok(Box::new(SinkHandler::new(sink).with_name(opts.name).with_min_level(opts.level))
                as Box<dyn Handler>)
        }));
    }

    fn register_builtin_definitions(&mut self) {
        for class in ["line", "json", "logfmt"] {
            self.define_formatter(class, ComponentSpec::class(class));
        }
        for class in ["process_id", "uid", "tag", "message_placeholders"] {
            self.define_processor(class, ComponentSpec::class(class), false);
        }
        self.define_handler(
            "error_log",
            HandlerSpec::new("stream").with_option("stream", "stderr"),
            false,
        );
    }

    pub fn register_handler_factory(&mut self, class: impl Into<String>, factory: HandlerFactory) {
        self.handler_factories.insert(class.into(), factory);
    }

    pub fn register_processor_factory(&mut self, class: impl Into<String>, factory: ProcessorFactory) {
        self.processor_factories.insert(class.into(), factory);
    }

    pub fn register_formatter_factory(&mut self, class: impl Into<String>, factory: FormatterFactory) {
        self.formatter_factories.insert(class.into(), factory);
    }

    /// Define or replace a formatter
    pub fn define_formatter(&mut self, name: impl Into<String>, spec: ComponentSpec) {
        let name = name.into();
        let priority = definition_priority(&name, spec.priority.as_ref());
        upsert(
            &mut self.formatters,
            ComponentDefinition {
                name,
                spec,
                priority,
                tagged: false,
            },
            |def| &def.name,
        );
    }

    /// Define or replace a processor; tagged processors go on the default logger
    pub fn define_processor(&mut self, name: impl Into<String>, spec: ComponentSpec, tagged: bool) {
        let name = name.into();
        let priority = definition_priority(&name, spec.priority.as_ref());
        self.processor_instances.remove(&name);
        upsert(
            &mut self.processors,
            ComponentDefinition {
                name,
                spec,
                priority,
                tagged,
            },
            |def| &def.name,
        );
    }

    /// Define or replace a handler; tagged handlers go on the default logger
    pub fn define_handler(&mut self, name: impl Into<String>, spec: HandlerSpec, tagged: bool) {
        let name = name.into();
        let priority = definition_priority(&name, spec.priority.as_ref());
        self.handler_instances.remove(&name);
        upsert(
            &mut self.handlers,
            HandlerDefinition {
                name,
                spec,
                priority,
                tagged,
            },
            |def| &def.name,
        );
    }

    /// Register a ready-made processor under `name`
    pub fn insert_processor(
        &mut self,
        name: impl Into<String>,
        priority: impl Into<Priority>,
        processor: Arc<dyn Processor>,
        tagged: bool,
    ) {
        let name = name.into();
        let spec = ComponentSpec::class(processor.name());
        self.processor_instances.insert(name.clone(), processor);
        upsert(
            &mut self.processors,
            ComponentDefinition {
                name,
                spec,
                priority: priority.into(),
                tagged,
            },
            |def| &def.name,
        );
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.iter().any(|def| def.name == name)
    }

    pub fn has_processor(&self, name: &str) -> bool {
        self.processors.iter().any(|def| def.name == name)
    }

    pub fn has_formatter(&self, name: &str) -> bool {
        self.formatters.iter().any(|def| def.name == name)
    }

    pub fn formatter(&mut self, name: &str) -> Result<Arc<dyn Formatter>> {
        if let Some(instance) = self.formatter_instances.get(name) {
            return Ok(Arc::clone(instance));
        }

        let def = self
            .formatters
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| LoggerError::config(format!("formatter '{}'", name), "no such formatter is defined"))?;
        let factory = self.formatter_factories.get(&def.spec.class).ok_or_else(|| {
            LoggerError::config(
                format!("formatter '{}'", name),
                format!("unknown formatter class '{}'", def.spec.class),
            )
        })?;

        let instance = factory(&ComponentOptions {
            name: &def.name,
            class: &def.spec.class,
            options: &def.spec.options,
            app_name: &self.app_name,
            log_dir: &self.log_dir,
            level: Severity::Debug,
        })?;
        self.formatter_instances
            .insert(name.to_string(), Arc::clone(&instance));
        Ok(instance)
    }

    pub fn processor(&mut self, name: &str) -> Result<ProcessorEntry> {
        let def = self
            .processors
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| LoggerError::config(format!("processor '{}'", name), "no such processor is defined"))?;
        let priority = def.priority;

        if let Some(instance) = self.processor_instances.get(name) {
            return Ok(ProcessorEntry::new(name, Arc::clone(instance)).with_priority(priority));
        }

        let factory = self.processor_factories.get(&def.spec.class).ok_or_else(|| {
            LoggerError::config(
                format!("processor '{}'", name),
                format!("unknown processor class '{}'", def.spec.class),
            )
        })?;

        let instance = factory(&ComponentOptions {
            name: &def.name,
            class: &def.spec.class,
            options: &def.spec.options,
            app_name: &self.app_name,
            log_dir: &self.log_dir,
            level: Severity::Debug,
        })?;
        self.processor_instances
            .insert(name.to_string(), Arc::clone(&instance));
        Ok(ProcessorEntry::new(name, instance).with_priority(priority))
    }

    /// Build (once) and return the handler entry for `name`
    ///
    /// The handler's formatter and private processors are applied before it
    /// is shared, in the order the processors are listed.
    pub fn handler(&mut self, name: &str) -> Result<HandlerEntry> {
        let index = self
            .handlers
            .iter()
            .position(|def| def.name == name)
            .ok_or_else(|| LoggerError::config(format!("handler '{}'", name), "no such handler is defined"))?;
        let priority = self.handlers[index].priority;

        if let Some(instance) = self.handler_instances.get(name) {
            return Ok(HandlerEntry::new(name, Arc::clone(instance)).with_priority(priority));
        }

        let spec = self.handlers[index].spec.clone();
        let component = format!("handler '{}'", name);
        let factory = self.handler_factories.get(&spec.class).cloned().ok_or_else(|| {
            LoggerError::config(&component, format!("unknown handler class '{}'", spec.class))
        })?;

        let mut handler = factory(&ComponentOptions {
            name,
            class: &spec.class,
            options: &spec.options,
            app_name: &self.app_name,
            log_dir: &self.log_dir,
            level: spec.min_level(name)?,
        })?;

        if let Some(formatter_name) = spec.formatter.as_deref() {
            let formatter = self.formatter(formatter_name).map_err(|e| {
                LoggerError::config(&component, format!("formatter '{}': {}", formatter_name, e))
            })?;
            handler.set_formatter(formatter)?;
        }

        for processor_name in &spec.processors {
            let entry = self.processor(processor_name).map_err(|e| {
                LoggerError::config(&component, format!("processor '{}': {}", processor_name, e))
            })?;
            handler.push_processor(entry)?;
        }

        let instance: Arc<dyn Handler> = Arc::from(handler);
        self.handler_instances
            .insert(name.to_string(), Arc::clone(&instance));
        Ok(HandlerEntry::new(name, instance).with_priority(priority))
    }

    /// Tagged handler names with their priority, in definition order
    pub fn tagged_handlers(&self) -> Vec<Prioritized<String>> {
        self.handlers
            .iter()
            .filter(|def| def.tagged)
            .map(|def| Prioritized::new(def.priority, def.name.clone()))
            .collect()
    }

    /// Tagged processor names with their priority, in definition order
    pub fn tagged_processors(&self) -> Vec<Prioritized<String>> {
        self.processors
            .iter()
            .filter(|def| def.tagged)
            .map(|def| Prioritized::new(def.priority, def.name.clone()))
            .collect()
    }

    /// Tagged handler names in attachment order
    pub fn sorted_handlers(&self) -> Vec<String> {
        sort_by_priority(self.tagged_handlers())
            .into_iter()
            .map(|entry| entry.item)
            .collect()
    }

    /// Tagged processor names in attachment order
    pub fn sorted_processors(&self) -> Vec<String> {
        sort_by_priority(self.tagged_processors())
            .into_iter()
            .map(|entry| entry.item)
            .collect()
    }
}

fn handler_fn<F>(f: F) -> HandlerFactory
where
    F: Fn(&ComponentOptions<'_>) -> Result<Box<dyn Handler>> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn processor_fn<F>(f: F) -> ProcessorFactory
where
    F: Fn(&ComponentOptions<'_>) -> Result<Arc<dyn Processor>> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn formatter_fn<F>(f: F) -> FormatterFactory
where
    F: Fn(&ComponentOptions<'_>) -> Result<Arc<dyn Formatter>> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn upsert<T>(list: &mut Vec<T>, item: T, key: impl Fn(&T) -> &String) {
    match list.iter().position(|existing| key(existing) == key(&item)) {
        Some(index) => list[index] = item,
        None => list.push(item),
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("app_name", &self.app_name)
            .field("log_dir", &self.log_dir)
            .field("handlers", &self.handlers.iter().map(|d| &d.name).collect::<Vec<_>>())
            .field("processors", &self.processors.iter().map(|d| &d.name).collect::<Vec<_>>())
            .field("formatters", &self.formatters.iter().map(|d| &d.name).collect::<Vec<_>>())
            .finish()
    }
}
