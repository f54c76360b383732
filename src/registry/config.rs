//! Declarative registry configuration
//!
//! ```toml
//! name = "shop"
//! log_dir = "/var/log/shop"
//! debug_screen_url = "https://errors.shop.example/"
//!
//! [formatters]
//! compact = { class = "line", include_context = false }
//!
//! [processors]
//! uid = { class = "uid", length = 12 }
//! 50 = "process_id"            # numeric names are priorities
//!
//! [handlers.main]
//! class = "file"
//! path = "shop.log"
//! level = "info"
//! formatter = "compact"
//! processors = ["uid"]
//! priority = 5
//!
//! [loggers.audit]
//! handlers = ["main"]
//! autowired = "AuditLog"
//!
//! [loggers.global]
//! processors = ["process_id"]
//! ```
//!
//! Every table keeps document order, which is the tie-break order for equal
//! priorities.

use crate::core::{LoggerError, Priority, Result, Severity};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Name of the logger entry whose refs apply to every logger
pub const GLOBAL_LOGGER: &str = "global";

/// String-keyed map that keeps document order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace; a replaced key keeps its position
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Formatter or processor definition: a bare class name or a table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ComponentDef {
    Class(String),
    Table(ComponentSpec),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentSpec {
    pub class: String,
    #[serde(default)]
    pub priority: Option<toml::Value>,
    /// Class specific options
    #[serde(flatten)]
    pub options: toml::Table,
}

impl ComponentSpec {
    /// A definition of `class` without options
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            priority: None,
            options: toml::Table::new(),
        }
    }
}

impl ComponentDef {
    /// Normalise a bare class name into a table with no options
    pub fn to_spec(&self) -> ComponentSpec {
        match self {
            ComponentDef::Class(class) => ComponentSpec::class(class.clone()),
            ComponentDef::Table(spec) => spec.clone(),
        }
    }
}

/// Handler definition; only the table form is valid
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HandlerDef {
    /// Rejected by [`LoggingConfig::validate`]
    Bare(String),
    Table(HandlerSpec),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HandlerSpec {
    pub class: String,
    #[serde(default)]
    pub formatter: Option<String>,
    #[serde(default)]
    pub processors: Vec<String>,
    /// Minimum severity, debug when absent
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub priority: Option<toml::Value>,
    #[serde(flatten)]
    pub options: toml::Table,
}

impl HandlerSpec {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            formatter: None,
            processors: Vec::new(),
            level: None,
            priority: None,
            options: toml::Table::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn min_level(&self, name: &str) -> Result<Severity> {
        match self.level.as_deref() {
            None => Ok(Severity::Debug),
            Some(level) => level.parse().map_err(|e: String| {
                LoggerError::config(format!("handler '{}'", name), e)
            }),
        }
    }
}

/// Logger definition; only the table form is valid
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LoggerDef {
    /// Rejected by [`LoggingConfig::validate`]
    Bare(String),
    Table(LoggerSpec),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoggerSpec {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub handlers: Vec<String>,
    #[serde(default)]
    pub processors: Vec<String>,
    /// Type name under which a host container should expose the logger
    #[serde(default)]
    pub autowired: Option<String>,
}

/// Root configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name; also the default logger's name
    pub name: String,
    pub log_dir: Option<PathBuf>,
    pub register_fallback: bool,
    pub use_priority_processor: bool,
    pub debug_screen_url: Option<String>,
    /// Host priority name used for `access` records
    pub access_priority: String,
    pub formatters: OrderedMap<ComponentDef>,
    pub processors: OrderedMap<ComponentDef>,
    pub handlers: OrderedMap<HandlerDef>,
    pub loggers: OrderedMap<LoggerDef>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "app".to_string(),
            log_dir: None,
            register_fallback: true,
            use_priority_processor: true,
            debug_screen_url: None,
            access_priority: "info".to_string(),
            formatters: OrderedMap::new(),
            processors: OrderedMap::new(),
            handlers: OrderedMap::new(),
            loggers: OrderedMap::new(),
        }
    }
}

/// Accepted severity or host priority for `access_priority`
fn is_known_priority(priority: &str) -> bool {
    matches!(priority, "exception" | "access") || priority.parse::<Severity>().is_ok()
}

impl LoggingConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                format!("reading config '{}'", path.display()),
                e.to_string(),
                e,
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Shape checks that do not need the definition catalog
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::config("name", "application name must not be empty"));
        }

        if !is_known_priority(&self.access_priority) {
            return Err(LoggerError::config(
                "access_priority",
                format!("unknown priority '{}'", self.access_priority),
            ));
        }

        for (name, def) in self.handlers.iter() {
            match def {
                HandlerDef::Bare(class) => {
                    return Err(LoggerError::config(
                        format!("handler '{}'", name),
                        format!(
                            "wrong handler format; handlers must be tables:\n\n\
                             [handlers.{name}]\nclass = \"{class}\"\n\
                             # formatter = \"formatterName\"\n\
                             # processors = [\"processorName\", ...]"
                        ),
                    ))
                }
                HandlerDef::Table(spec) => {
                    spec.min_level(name)?;
                }
            }
        }

        for (name, def) in self.loggers.iter() {
            if let LoggerDef::Bare(class) = def {
                return Err(LoggerError::config(
                    format!("logger '{}'", name),
                    format!(
                        "wrong logger format; loggers must be tables:\n\n\
                         [loggers.{name}]\nclass = \"{class}\"\n\
                         # processors = [\"processorName\", ...]\n\
                         # handlers = [\"handlerName\", ...]"
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Handler definitions in document order; bare entries are skipped
    pub fn handler_specs(&self) -> impl Iterator<Item = (&str, &HandlerSpec)> {
        self.handlers.iter().filter_map(|(name, def)| match def {
            HandlerDef::Table(spec) => Some((name, spec)),
            HandlerDef::Bare(_) => None,
        })
    }

    /// Logger definitions in document order, `global` excluded
    pub fn logger_specs(&self) -> impl Iterator<Item = (&str, &LoggerSpec)> {
        self.loggers.iter().filter_map(|(name, def)| match def {
            LoggerDef::Table(spec) if name != GLOBAL_LOGGER => Some((name, spec)),
            _ => None,
        })
    }

    pub fn global_logger(&self) -> Option<&LoggerSpec> {
        match self.loggers.get(GLOBAL_LOGGER) {
            Some(LoggerDef::Table(spec)) => Some(spec),
            _ => None,
        }
    }
}

/// Priority of a definition: explicit `priority`, else a numeric name, else 0
pub fn definition_priority(name: &str, explicit: Option<&toml::Value>) -> Priority {
    match explicit {
        Some(value) => Priority::from_toml(Some(value)),
        None => Priority::parse(name),
    }
}
