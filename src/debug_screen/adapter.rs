//! Bridge from a host error logger to a [`Logger`]

use super::renderer::BlueScreenRenderer;
use crate::core::{Context, ErrorReport, Log, Logger, Result, Severity};
use std::error::Error as StdError;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

pub const DEBUG: &str = "debug";
pub const INFO: &str = "info";
pub const WARNING: &str = "warning";
pub const ERROR: &str = "error";
pub const EXCEPTION: &str = "exception";
pub const CRITICAL: &str = "critical";
pub const ACCESS: &str = "access";

/// Accepts host priority names and forwards records to a logger
///
/// Host priorities map onto severities (`exception` becomes critical,
/// `access` becomes the configured access severity, anything else is parsed
/// as a severity name and defaults to info). Each record carries the host
/// `priority` name and the caller location `at` in its context. Errors are
/// rendered to a debug page first and the page path is returned.
#[derive(Debug, Clone)]
pub struct DebugScreenAdapter {
    logger: Logger,
    renderer: Arc<BlueScreenRenderer>,
    access_priority: String,
}

impl DebugScreenAdapter {
    pub fn new(logger: Logger, renderer: Arc<BlueScreenRenderer>) -> Self {
        Self {
            logger,
            renderer,
            access_priority: INFO.to_string(),
        }
    }

    /// Priority name used in place of `access`
    #[must_use]
    pub fn with_access_priority(mut self, priority: impl Into<String>) -> Self {
        self.access_priority = priority.into();
        self
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn renderer(&self) -> &BlueScreenRenderer {
        &self.renderer
    }

    /// Severity for a host priority name
    pub fn severity_for(&self, priority: &str) -> Severity {
        let priority = if priority == ACCESS {
            self.access_priority.as_str()
        } else {
            priority
        };

        match priority {
            DEBUG => Severity::Debug,
            INFO => Severity::Info,
            WARNING => Severity::Warning,
            ERROR => Severity::Error,
            EXCEPTION | CRITICAL => Severity::Critical,
            other => other.parse().unwrap_or(Severity::Info),
        }
    }

    /// Log a plain message
    #[track_caller]
    pub fn log(&self, message: &str, priority: &str) {
        let context = self.context(priority, Location::caller());
        self.logger.log(self.severity_for(priority), message, context);
    }

    /// Render `error` to a debug page, then log it
    ///
    /// Returns the page path. A page that cannot be written is an error and
    /// nothing is logged.
    #[track_caller]
    pub fn log_error(&self, error: &(dyn StdError + 'static), priority: &str) -> Result<PathBuf> {
        let location = Location::caller();
        let report = ErrorReport::capture(error);
        let page = self.renderer.log_exception(&report)?;

        let context = self.context(priority, location);
        let message = report.message.clone();
        self.logger
            .log_report(self.severity_for(priority), &message, report, context);
        Ok(page)
    }

    /// Page path an error would be rendered to
    pub fn exception_file(&self, error: &(dyn StdError + 'static)) -> PathBuf {
        self.renderer.exception_file(&ErrorReport::capture(error))
    }

    fn context(&self, priority: &str, location: &Location<'_>) -> Context {
        Context::new()
            .with_field("priority", priority)
            .with_field("at", format!("{}:{}", location.file(), location.line()))
    }
}
