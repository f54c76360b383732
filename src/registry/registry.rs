//! Frozen logger registry

use crate::core::{Logger, Result};
use crate::debug_screen::{BlueScreenRenderer, DebugScreenAdapter};
use std::path::{Path, PathBuf};

/// A built logger and the type name it should be injected as, if any
#[derive(Debug, Clone)]
pub struct LoggerInfo {
    pub name: String,
    pub logger: Logger,
    pub autowired: Option<String>,
}

/// Loggers produced by [`RegistryBuilder::build`](super::RegistryBuilder::build)
///
/// All loggers are frozen. The default logger is named after the
/// application and always comes first.
#[derive(Debug)]
pub struct Registry {
    default_name: String,
    log_dir: PathBuf,
    loggers: Vec<LoggerInfo>,
    debug_screen: DebugScreenAdapter,
}

impl Registry {
    pub(crate) fn new(
        default_name: String,
        log_dir: PathBuf,
        loggers: Vec<LoggerInfo>,
        debug_screen: DebugScreenAdapter,
    ) -> Self {
        Self {
            default_name,
            log_dir,
            loggers,
            debug_screen,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Logger> {
        self.loggers
            .iter()
            .find(|info| info.name == name)
            .map(|info| &info.logger)
    }

    pub fn default_logger(&self) -> &Logger {
        self.debug_screen.logger()
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Logger names, default first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loggers.iter().map(|info| info.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoggerInfo> {
        self.loggers.iter()
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    /// Type name a named logger is meant to be injected as
    pub fn autowire_hint(&self, name: &str) -> Option<&str> {
        self.loggers
            .iter()
            .find(|info| info.name == name)
            .and_then(|info| info.autowired.as_deref())
    }

    /// Host adapter bound to the default logger
    pub fn debug_screen(&self) -> &DebugScreenAdapter {
        &self.debug_screen
    }

    pub fn renderer(&self) -> &BlueScreenRenderer {
        self.debug_screen.renderer()
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Flush every logger; the first error is returned after all were tried
    pub fn flush_all(&self) -> Result<()> {
        let mut first_error = None;
        for info in &self.loggers {
            if let Err(e) = info.logger.flush() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{LoggingConfig, RegistryBuilder};
    use tempfile::TempDir;

    #[test]
    fn test_lookup_and_order() {
        let dir = TempDir::new().unwrap();
        let mut config = LoggingConfig::from_toml_str(
            r#"
            name = "shop"
            [loggers.jobs]
            autowired = "JobLogger"
            [loggers.audit]
            "#,
        )
        .unwrap();
        config.log_dir = Some(dir.path().to_path_buf());

        let registry = RegistryBuilder::new(config).build().unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["shop", "jobs", "audit"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.default_name(), "shop");
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.autowire_hint("jobs"), Some("JobLogger"));
        assert_eq!(registry.autowire_hint("audit"), None);
        assert_eq!(registry.log_dir(), dir.path());
        assert_eq!(registry.renderer().directory(), dir.path());
        registry.flush_all().unwrap();
    }
}
