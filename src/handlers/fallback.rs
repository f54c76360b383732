//! Fallback handler policy
//!
//! A logger that ends the build phase without handlers would silently drop
//! every record. The registry evaluates [`FallbackPolicy`] per logger after
//! all configured and global handlers are attached and, when the logger is
//! still unconfigured, pushes exactly one [`fallback_handler`] last.

use super::{file::FileSink, sink_handler::SinkHandler};
use crate::core::{HandlerEntry, Priority, Result, Severity};
use crate::formatters::LineFormatter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Id of the injected handler entry
pub const FALLBACK_HANDLER_ID: &str = "fallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// At least one handler attached
    Configured,
    /// No handler attached
    Unconfigured,
}

impl FallbackPolicy {
    pub fn evaluate(handlers: &[HandlerEntry]) -> Self {
        if handlers.is_empty() {
            FallbackPolicy::Unconfigured
        } else {
            FallbackPolicy::Configured
        }
    }

    /// True when a fallback handler must be injected
    pub fn needs_fallback(self, register_fallback: bool) -> bool {
        register_fallback && self == FallbackPolicy::Unconfigured
    }
}

/// `<log_dir>/<app_name>.log`
pub fn fallback_path(app_name: &str, log_dir: &Path) -> PathBuf {
    log_dir.join(format!("{}.log", app_name))
}

/// Line-formatted file handler accepting every level
///
/// The directory must already exist; the registry creates it before any
/// handler is constructed.
pub fn fallback_handler(app_name: &str, log_dir: &Path) -> Result<HandlerEntry> {
    let sink = FileSink::new(fallback_path(app_name, log_dir))?;
    let handler = SinkHandler::new(sink)
        .with_name(FALLBACK_HANDLER_ID)
        .with_min_level(Severity::Debug)
        .with_formatter(Arc::new(LineFormatter::new()));

    Ok(HandlerEntry::new(FALLBACK_HANDLER_ID, Arc::new(handler)).with_priority(Priority(i32::MAX)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, Log, Logger};
    use tempfile::TempDir;

    #[test]
    fn test_policy_states() {
        assert_eq!(FallbackPolicy::evaluate(&[]), FallbackPolicy::Unconfigured);
        assert!(FallbackPolicy::Unconfigured.needs_fallback(true));
        assert!(!FallbackPolicy::Unconfigured.needs_fallback(false));
        assert!(!FallbackPolicy::Configured.needs_fallback(true));
    }

    #[test]
    fn test_fallback_writes_to_app_log() {
        let dir = TempDir::new().unwrap();
        let entry = fallback_handler("shop", dir.path()).unwrap();
        assert_eq!(entry.id, FALLBACK_HANDLER_ID);

        let logger = Logger::new("shop");
        logger.push_handler(entry).unwrap();
        logger.debug("kept", Context::new());

        let content = std::fs::read_to_string(dir.path().join("shop.log")).unwrap();
        assert!(content.contains("shop.DEBUG: kept"));
    }
}
