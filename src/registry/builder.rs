//! Single-pass registry build

use super::catalog::{Catalog, FormatterFactory, HandlerFactory, ProcessorFactory};
use super::config::{HandlerDef, LoggerSpec, LoggingConfig};
use super::registry::{LoggerInfo, Registry};
use crate::core::{
    sort_by_priority, HandlerEntry, Logger, LoggerError, Prioritized, ProcessorEntry, Result,
    SinkFailureCallback,
};
use crate::debug_screen::{BlueScreenRenderer, DebugPage, DebugScreenAdapter, HtmlDebugPage};
use crate::handlers::{fallback_handler, FallbackPolicy};
use crate::processors::{
    DebugScreenExceptionProcessor, DebugScreenUrlProcessor, PriorityChannelProcessor,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// System processor priorities
pub const PRIORITY_CHANNEL_PRIORITY: i32 = 20;
pub const DEBUG_SCREEN_EXCEPTION_PRIORITY: i32 = 100;
pub const DEBUG_SCREEN_URL_PRIORITY: i32 = 10;

/// Handler and processor refs for one logger, before sorting
#[derive(Debug, Default)]
struct AttachmentPlan {
    handlers: Vec<String>,
    processors: Vec<String>,
}

impl AttachmentPlan {
    fn extend(&mut self, spec: &LoggerSpec) {
        self.handlers.extend(spec.handlers.iter().cloned());
        self.processors.extend(spec.processors.iter().cloned());
    }
}

/// Builds a frozen [`Registry`] from a [`LoggingConfig`]
///
/// # Example
///
/// ```
/// use channel_logger::registry::{LoggingConfig, RegistryBuilder};
/// use channel_logger::prelude::*;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = LoggingConfig::from_toml_str(&format!(
///     r#"
///     name = "shop"
///     log_dir = "{}"
///
///     [handlers.main]
///     class = "file"
///     level = "info"
///     "#,
///     dir.path().display()
/// ))
/// .unwrap();
///
/// let registry = RegistryBuilder::new(config).build().unwrap();
/// let logger = registry.default_logger();
/// logger.info("started", Context::new());
/// assert!(dir.path().join("main.log").exists());
/// ```
pub struct RegistryBuilder {
    config: LoggingConfig,
    app_dir: Option<PathBuf>,
    page: Option<Arc<dyn DebugPage>>,
    on_sink_failure: Option<SinkFailureCallback>,
    handler_factories: Vec<(String, HandlerFactory)>,
    processor_factories: Vec<(String, ProcessorFactory)>,
    formatter_factories: Vec<(String, FormatterFactory)>,
}

impl RegistryBuilder {
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            config,
            app_dir: None,
            page: None,
            on_sink_failure: None,
            handler_factories: Vec::new(),
            processor_factories: Vec::new(),
            formatter_factories: Vec::new(),
        }
    }

    /// Application directory; the log directory defaults to `<app_dir>/../log`
    #[must_use]
    pub fn app_dir(mut self, app_dir: impl Into<PathBuf>) -> Self {
        self.app_dir = Some(app_dir.into());
        self
    }

    /// Page renderer used for error pages
    #[must_use]
    pub fn renderer(mut self, page: Arc<dyn DebugPage>) -> Self {
        self.page = Some(page);
        self
    }

    /// Called whenever a handler of any logger fails
    #[must_use]
    pub fn on_sink_failure(mut self, callback: SinkFailureCallback) -> Self {
        self.on_sink_failure = Some(callback);
        self
    }

    /// Add or override a handler class
    #[must_use]
    pub fn register_handler_factory(mut self, class: impl Into<String>, factory: HandlerFactory) -> Self {
        self.handler_factories.push((class.into(), factory));
        self
    }

    #[must_use]
    pub fn register_processor_factory(
        mut self,
        class: impl Into<String>,
        factory: ProcessorFactory,
    ) -> Self {
        self.processor_factories.push((class.into(), factory));
        self
    }

    #[must_use]
    pub fn register_formatter_factory(
        mut self,
        class: impl Into<String>,
        factory: FormatterFactory,
    ) -> Self {
        self.formatter_factories.push((class.into(), factory));
        self
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// `log_dir` from config, else `<app_dir>/../log`, else `./log`
    pub fn resolve_log_dir(&self) -> PathBuf {
        if let Some(dir) = &self.config.log_dir {
            return dir.clone();
        }
        match &self.app_dir {
            Some(app_dir) => app_dir.join("..").join("log"),
            None => PathBuf::from("log"),
        }
    }

    /// Validate, resolve, attach, freeze
    ///
    /// Any configuration or directory error aborts the build; nothing is
    /// returned half-built.
    pub fn build(&self) -> Result<Registry> {
        self.config.validate()?;

        let log_dir = self.resolve_log_dir();
        create_log_dir(&log_dir)?;

        let page = self
            .page
            .clone()
            .unwrap_or_else(|| Arc::new(HtmlDebugPage::new()) as Arc<dyn DebugPage>);
        let renderer = Arc::new(BlueScreenRenderer::with_page(&log_dir, page));

        let mut catalog = self.catalog(&log_dir, &renderer);
        let plans = self.plans(&catalog)?;

        let mut loggers = Vec::with_capacity(plans.len());
        for (name, plan, autowired) in plans {
            let logger = self.attach(&mut catalog, &name, &plan)?;
            loggers.push(LoggerInfo {
                name,
                logger,
                autowired,
            });
        }

        let default_logger = loggers[0].logger.clone();
        let debug_screen = DebugScreenAdapter::new(default_logger, Arc::clone(&renderer))
            .with_access_priority(self.config.access_priority.clone());

        Ok(Registry::new(
            self.config.name.clone(),
            log_dir,
            loggers,
            debug_screen,
        ))
    }

    fn catalog(&self, log_dir: &Path, renderer: &Arc<BlueScreenRenderer>) -> Catalog {
        let mut catalog = Catalog::new(&self.config.name, log_dir);

        for (class, factory) in &self.handler_factories {
            catalog.register_handler_factory(class.clone(), Arc::clone(factory));
        }
        for (class, factory) in &self.processor_factories {
            catalog.register_processor_factory(class.clone(), Arc::clone(factory));
        }
        for (class, factory) in &self.formatter_factories {
            catalog.register_formatter_factory(class.clone(), Arc::clone(factory));
        }

        for (name, def) in self.config.formatters.iter() {
            catalog.define_formatter(name, def.to_spec());
        }
        for (name, def) in self.config.processors.iter() {
            catalog.define_processor(name, def.to_spec(), true);
        }
        for (name, def) in self.config.handlers.iter() {
            if let HandlerDef::Table(spec) = def {
                catalog.define_handler(name, spec.clone(), true);
            }
        }

        if self.config.use_priority_processor {
            catalog.insert_processor(
                "priority_channel",
                PRIORITY_CHANNEL_PRIORITY,
                Arc::new(PriorityChannelProcessor::new()),
                true,
            );
        }
        catalog.insert_processor(
            "debug_screen_exception",
            DEBUG_SCREEN_EXCEPTION_PRIORITY,
            Arc::new(DebugScreenExceptionProcessor::new(Arc::clone(renderer))),
            true,
        );
        if let Some(base_url) = &self.config.debug_screen_url {
            catalog.insert_processor(
                "debug_screen_url",
                DEBUG_SCREEN_URL_PRIORITY,
                Arc::new(DebugScreenUrlProcessor::new(base_url.clone(), Arc::clone(renderer))),
                true,
            );
        }

        catalog
    }

    /// Default logger first, then named loggers in document order
    fn plans(&self, catalog: &Catalog) -> Result<Vec<(String, AttachmentPlan, Option<String>)>> {
        let mut plans = Vec::new();

        let default_plan = AttachmentPlan {
            handlers: catalog.sorted_handlers(),
            processors: catalog.sorted_processors(),
        };
        plans.push((self.config.name.clone(), default_plan, None));

        for (name, spec) in self.config.logger_specs() {
            if name == self.config.name {
                return Err(LoggerError::config(
                    format!("logger '{}'", name),
                    "name is taken by the default logger",
                ));
            }
            if let Some(class) = spec.class.as_deref() {
                if class != "logger" {
                    return Err(LoggerError::config(
                        format!("logger '{}'", name),
                        format!("unknown logger class '{}'", class),
                    ));
                }
            }
            let mut plan = AttachmentPlan::default();
            plan.extend(spec);
            plans.push((name.to_string(), plan, spec.autowired.clone()));
        }

        if let Some(global) = self.config.global_logger() {
            for (_, plan, _) in plans.iter_mut() {
                plan.extend(global);
            }
        }

        for (name, plan, _) in &plans {
            for handler in &plan.handlers {
                if !catalog.has_handler(handler) {
                    return Err(LoggerError::config(
                        format!("logger '{}'", name),
                        format!("unknown handler '{}'", handler),
                    ));
                }
            }
            for processor in &plan.processors {
                if !catalog.has_processor(processor) {
                    return Err(LoggerError::config(
                        format!("logger '{}'", name),
                        format!("unknown processor '{}'", processor),
                    ));
                }
            }
        }

        Ok(plans)
    }

    fn attach(&self, catalog: &mut Catalog, name: &str, plan: &AttachmentPlan) -> Result<Logger> {
        let logger = Logger::new(name);

        let mut handlers = Vec::new();
        for id in dedup(&plan.handlers) {
            let entry: HandlerEntry = catalog.handler(id)?;
            handlers.push(Prioritized::new(entry.priority, entry));
        }
        let mut processors = Vec::new();
        for id in dedup(&plan.processors) {
            let entry: ProcessorEntry = catalog.processor(id)?;
            processors.push(Prioritized::new(entry.priority, entry));
        }

        for entry in sort_by_priority(processors) {
            logger.push_processor(entry.item)?;
        }
        for entry in sort_by_priority(handlers) {
            logger.push_handler(entry.item)?;
        }

        if FallbackPolicy::evaluate(&logger.handlers()).needs_fallback(self.config.register_fallback) {
            logger.push_handler(fallback_handler(&self.config.name, catalog.log_dir())?)?;
        }

        if let Some(callback) = &self.on_sink_failure {
            logger.set_sink_failure_callback(Arc::clone(callback))?;
        }

        logger.freeze();
        Ok(logger)
    }
}

/// First occurrence of each id, in order
fn dedup(ids: &[String]) -> Vec<&str> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id.as_str()) {
            seen.push(id.as_str());
        }
    }
    seen
}

/// Create the log directory unless it already exists
pub fn create_log_dir(path: &Path) -> Result<()> {
    match std::fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(_) if path.is_dir() => Ok(()),
        Err(e) => Err(LoggerError::directory_creation(path, e)),
    }
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("config", &self.config)
            .field("app_dir", &self.app_dir)
            .finish()
    }
}
