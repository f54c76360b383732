//! Integration tests for the logger registry
//!
//! These tests verify:
//! - Handler invocation order follows priority
//! - Handler failure isolation
//! - Fallback handler injection
//! - Level filtering
//! - Idempotent registry builds
//! - Channel tagging
//! - Configuration and log directory errors
//! - Debug page rendering through the host adapter

use channel_logger::handlers::{FileSink, MemoryBuffer, MemorySink, SinkHandler};
use channel_logger::prelude::*;
use channel_logger::registry::{ComponentOptions, HandlerFactory};
use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

type CallOrder = Arc<Mutex<Vec<String>>>;

/// Wraps a handler and records when it is invoked
struct Probe {
    inner: Box<dyn Handler>,
    calls: CallOrder,
}

impl Handler for Probe {
    fn is_handling(&self, level: Severity) -> bool {
        self.inner.is_handling(level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        self.calls.lock().push(self.inner.name().to_string());
        self.inner.handle(record)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn set_formatter(&mut self, formatter: Arc<dyn Formatter>) -> Result<()> {
        self.inner.set_formatter(formatter)
    }

    fn push_processor(&mut self, entry: ProcessorEntry) -> Result<()> {
        self.inner.push_processor(entry)
    }
}

/// Always fails
struct Broken;

impl Handler for Broken {
    fn is_handling(&self, _level: Severity) -> bool {
        true
    }

    fn handle(&self, _record: &Record) -> Result<()> {
        Err(LoggerError::sink_failure("broken", "disk on fire"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// `probe` handlers write to memory (`sink = "memory"`) or to a file
fn probe_factory(buffer: MemoryBuffer, calls: CallOrder) -> HandlerFactory {
    Arc::new(
        move |opts: &ComponentOptions<'_>| -> Result<Box<dyn Handler>> {
            let inner: Box<dyn Handler> = match opts.str_option("sink")? {
                Some("memory") => Box::new(
                    SinkHandler::new(MemorySink::with_buffer(buffer.clone()))
                        .with_name(opts.name)
                        .with_min_level(opts.level),
                ),
                _ => Box::new(
                    SinkHandler::new(FileSink::new(
                        opts.log_dir.join(format!("{}.log", opts.name)),
                    )?)
                    .with_name(opts.name)
                    .with_min_level(opts.level),
                ),
            };
            Ok(Box::new(Probe {
                inner,
                calls: Arc::clone(&calls),
            }) as Box<dyn Handler>)
        },
    )
}

fn broken_factory() -> HandlerFactory {
    Arc::new(|_opts: &ComponentOptions<'_>| -> Result<Box<dyn Handler>> {
        Ok(Box::new(Broken) as Box<dyn Handler>)
    })
}

fn capture_factory(buffer: MemoryBuffer) -> HandlerFactory {
    Arc::new(
        move |opts: &ComponentOptions<'_>| -> Result<Box<dyn Handler>> {
            Ok(Box::new(
                SinkHandler::new(MemorySink::with_buffer(buffer.clone()))
                    .with_name(opts.name)
                    .with_min_level(opts.level),
            ) as Box<dyn Handler>)
        },
    )
}

fn config_in(dir: &TempDir, body: &str) -> LoggingConfig {
    let mut config = LoggingConfig::from_toml_str(body).expect("Failed to parse config");
    config.log_dir = Some(dir.path().join("log"));
    config
}

fn handler_ids(logger: &Logger) -> Vec<String> {
    logger.handlers().into_iter().map(|entry| entry.id).collect()
}

fn processor_ids(logger: &Logger) -> Vec<String> {
    logger.processors().into_iter().map(|entry| entry.id).collect()
}

#[test]
fn test_app_scenario_priority_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let buffer = MemoryBuffer::new();
    let calls: CallOrder = Arc::default();

    let config = config_in(
        &temp_dir,
        r#"
        name = "app"

        [handlers.file_sink]
        class = "probe"
        priority = 5

        [handlers.memory_sink]
        class = "probe"
        sink = "memory"
        priority = 1
        "#,
    );
    let registry = RegistryBuilder::new(config)
        .register_handler_factory("probe", probe_factory(buffer.clone(), Arc::clone(&calls)))
        .build()
        .expect("Failed to build registry");

    let logger = registry.get("app").expect("Missing app logger");
    assert_eq!(handler_ids(logger), vec!["memory_sink", "file_sink"]);

    logger.error("boom", Context::new().with_field("user", 7));

    assert_eq!(*calls.lock(), vec!["memory_sink", "file_sink"]);

    let records = buffer.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.message, "boom");
    assert_eq!(record.level, Severity::Error);
    assert_eq!(record.context.get("user"), Some(&FieldValue::Int(7)));

    let content = fs::read_to_string(temp_dir.path().join("log").join("file_sink.log"))
        .expect("Failed to read log file");
    assert!(content.contains("app.ERROR: boom"));
    assert!(content.contains("user"));
    assert!(content.contains('7'));
}

#[test]
fn test_failing_handler_is_isolated() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let buffer = MemoryBuffer::new();
    let failures = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&failures);

    let config = config_in(
        &temp_dir,
        r#"
        [handlers.a]
        class = "broken"
        [handlers.b]
        class = "capture"
        "#,
    );
    let registry = RegistryBuilder::new(config)
        .register_handler_factory("broken", broken_factory())
        .register_handler_factory("capture", capture_factory(buffer.clone()))
        .on_sink_failure(Arc::new(move |handler: &str, _error: &LoggerError| {
            assert_eq!(handler, "a");
            seen.fetch_add(1, Ordering::SeqCst);
        }))
        .build()
        .expect("Failed to build registry");

    let logger = registry.default_logger();
    logger.info("still delivered", Context::new());

    assert_eq!(buffer.len(), 1);
    assert_eq!(buffer.records()[0].message, "still delivered");
    assert_eq!(failures.load(Ordering::SeqCst), 1);
    assert_eq!(logger.metrics().sink_failures(), 1);
    assert_eq!(logger.metrics().records_handled(), 1);
}

#[test]
fn test_fallback_injected_only_when_empty() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_in(
        &temp_dir,
        r#"
        name = "shop"
        [handlers.main]
        class = "null"
        [loggers.empty]
        [loggers.busy]
        handlers = ["main"]
        "#,
    );
    let registry = RegistryBuilder::new(config)
        .build()
        .expect("Failed to build registry");

    assert_eq!(handler_ids(registry.default_logger()), vec!["main"]);
    assert_eq!(handler_ids(registry.get("busy").unwrap()), vec!["main"]);
    assert_eq!(handler_ids(registry.get("empty").unwrap()), vec!["fallback"]);

    registry
        .get("empty")
        .unwrap()
        .debug("lands in the fallback file", Context::new());
    let content = fs::read_to_string(temp_dir.path().join("log").join("shop.log"))
        .expect("Failed to read fallback file");
    assert!(content.contains("empty.DEBUG: lands in the fallback file"));
}

#[test]
fn test_fallback_disabled_leaves_logger_empty() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_in(
        &temp_dir,
        r#"
        register_fallback = false
        [loggers.empty]
        "#,
    );
    let registry = RegistryBuilder::new(config)
        .build()
        .expect("Failed to build registry");

    let logger = registry.get("empty").unwrap();
    assert!(logger.handlers().is_empty());
    assert!(!logger.is_handling(Severity::Emergency));
    logger.emergency("nobody listens", Context::new());
    assert_eq!(logger.metrics().records_ignored(), 1);
}

#[test]
fn test_level_filtering() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let buffer = MemoryBuffer::new();
    let config = config_in(
        &temp_dir,
        r#"
        [handlers.warnings]
        class = "capture"
        level = "warning"
        "#,
    );
    let registry = RegistryBuilder::new(config)
        .register_handler_factory("capture", capture_factory(buffer.clone()))
        .build()
        .expect("Failed to build registry");

    let logger = registry.default_logger();
    assert!(!logger.is_handling(Severity::Info));
    assert!(logger.is_handling(Severity::Warning));

    logger.info("dropped", Context::new());
    logger.warning("kept", Context::new());
    logger.critical("kept too", Context::new());

    let messages: Vec<String> = buffer.records().into_iter().map(|r| r.message).collect();
    assert_eq!(messages, vec!["kept", "kept too"]);
    assert_eq!(logger.metrics().records_ignored(), 1);
}

#[test]
fn test_build_is_idempotent() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = r#"
        [formatters.json]
        class = "json"
        [processors]
        10 = "uid"
        tags = { class = "tag", tags = ["api"] }
        [handlers.z]
        class = "null"
        [handlers.a]
        class = "null"
        formatter = "json"
        priority = -1
        [handlers.m]
        class = "null"
        [loggers.jobs]
        handlers = ["m", "z", "a"]
        processors = ["tags", "process_id"]
        "#;

    let builder = RegistryBuilder::new(config_in(&temp_dir, body));
    let first = builder.build().expect("First build failed");
    let second = builder.build().expect("Second build failed");
    let third = RegistryBuilder::new(config_in(&temp_dir, body))
        .build()
        .expect("Third build failed");

    for registry in [&second, &third] {
        assert_eq!(
            first.names().collect::<Vec<_>>(),
            registry.names().collect::<Vec<_>>()
        );
        for name in first.names() {
            let a = first.get(name).unwrap();
            let b = registry.get(name).unwrap();
            assert_eq!(handler_ids(a), handler_ids(b));
            assert_eq!(processor_ids(a), processor_ids(b));
        }
    }
    assert_eq!(handler_ids(first.get("jobs").unwrap()), vec!["a", "m", "z"]);
}

#[test]
fn test_channel_overrides_context_channel() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let buffer = MemoryBuffer::new();
    let config = config_in(
        &temp_dir,
        r#"
        [handlers.capture]
        class = "capture"
        "#,
    );
    let registry = RegistryBuilder::new(config)
        .register_handler_factory("capture", capture_factory(buffer.clone()))
        .build()
        .expect("Failed to build registry");

    let audit = registry.default_logger().channel("audit");
    audit.info("login", Context::new().with_field("channel", "spoofed"));

    let records = buffer.records();
    let record = &records[0];
    assert_eq!(record.channel.as_deref(), Some("audit"));
    assert_eq!(record.context.get("channel").and_then(FieldValue::as_str), Some("audit"));
    assert_eq!(record.logger, "app");
}

#[test]
fn test_bare_string_handler_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_in(
        &temp_dir,
        r#"
        [handlers]
        main = "file"
        "#,
    );

    let err = RegistryBuilder::new(config).build().unwrap_err();
    assert!(err.is_build_error());
    let message = err.to_string();
    assert!(message.contains("[handlers.main]"));
    assert!(message.contains("class = \"file\""));
}

#[test]
fn test_log_dir_created_on_build() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = LoggingConfig::default();
    let nested: PathBuf = temp_dir.path().join("var").join("log").join("shop");
    config.log_dir = Some(nested.clone());

    let builder = RegistryBuilder::new(config);
    builder.build().expect("First build failed");
    assert!(nested.is_dir());
    builder.build().expect("Existing directory must be accepted");
}

#[test]
fn test_log_dir_defaults_next_to_app_dir() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app_dir = temp_dir.path().join("app");
    fs::create_dir(&app_dir).expect("Failed to create app dir");

    let registry = RegistryBuilder::new(LoggingConfig::default())
        .app_dir(&app_dir)
        .build()
        .expect("Failed to build registry");
    assert!(temp_dir.path().join("log").is_dir());
    assert_eq!(registry.log_dir(), app_dir.join("..").join("log"));
}

#[test]
fn test_log_dir_creation_failure_aborts_build() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("not-a-dir");
    fs::write(&blocker, "occupied").expect("Failed to write file");

    let mut config = LoggingConfig::default();
    config.log_dir = Some(blocker.join("log"));
    let err = RegistryBuilder::new(config).build().unwrap_err();
    assert!(matches!(err, LoggerError::DirectoryCreation { .. }));
}

#[test]
fn test_frozen_loggers_reject_changes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = RegistryBuilder::new(config_in(&temp_dir, ""))
        .build()
        .expect("Failed to build registry");

    let logger = registry.default_logger();
    assert!(logger.is_frozen());
    assert!(matches!(logger.pop_handler(), Err(LoggerError::Frozen { .. })));
    let channel = logger.channel("jobs");
    assert!(matches!(channel.pop_processor(), Err(LoggerError::Frozen { .. })));
}

#[test]
fn test_debug_screen_renders_error_page() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let buffer = MemoryBuffer::new();
    let config = config_in(
        &temp_dir,
        r#"
        debug_screen_url = "https://errors.example/pages/"
        [handlers.capture]
        class = "capture"
        "#,
    );
    let registry = RegistryBuilder::new(config)
        .register_handler_factory("capture", capture_factory(buffer.clone()))
        .build()
        .expect("Failed to build registry");

    let error = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    let page = registry
        .debug_screen()
        .log_error(&error, "error")
        .expect("Failed to render page");
    assert!(page.exists());
    assert!(page.starts_with(registry.log_dir()));

    let file_name = page.file_name().unwrap().to_string_lossy().into_owned();
    let records = buffer.records();
    let record = &records[0];
    assert_eq!(record.level, Severity::Error);
    assert_eq!(record.message, "config.toml missing");
    assert!(record.exception.is_some());
    assert_eq!(
        record.context.get("debug_screen").and_then(FieldValue::as_str),
        Some(file_name.as_str())
    );
    assert_eq!(
        record.context.get("debug_screen_url").and_then(FieldValue::as_str),
        Some(format!("https://errors.example/pages/{}", file_name).as_str())
    );
}
