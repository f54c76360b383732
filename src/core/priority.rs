//! Priority ordering for handler and processor attachment
//!
//! Entries are attached in ascending priority and the logger invokes them in
//! attachment order, so the lowest priority runs first and the highest runs
//! last. Entries with equal priority keep their registration order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer attachment priority; missing or non-numeric values are 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    pub const DEFAULT: Priority = Priority(0);

    /// Parse a priority tag, falling back to 0 for anything non-numeric
    pub fn parse(tag: &str) -> Self {
        tag.trim()
            .parse::<i64>()
            .ok()
            .and_then(|value| i32::try_from(value).ok())
            .map(Priority)
            .unwrap_or_default()
    }

    /// Read a priority from a config value
    pub fn from_toml(value: Option<&toml::Value>) -> Self {
        match value {
            Some(toml::Value::Integer(i)) => i32::try_from(*i).map(Priority).unwrap_or_default(),
            Some(toml::Value::String(s)) => Priority::parse(s),
            _ => Priority::DEFAULT,
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Priority(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An item tagged with a priority and its registration position
#[derive(Debug, Clone)]
pub struct Prioritized<T> {
    pub priority: Priority,
    pub item: T,
}

impl<T> Prioritized<T> {
    pub fn new(priority: impl Into<Priority>, item: T) -> Self {
        Self {
            priority: priority.into(),
            item,
        }
    }
}

/// Stable ascending sort by priority
///
/// `Vec::sort_by_key` is a stable merge sort, so ties keep the order in
/// which they were registered.
pub fn sort_by_priority<T>(mut entries: Vec<Prioritized<T>>) -> Vec<Prioritized<T>> {
    entries.sort_by_key(|entry| entry.priority);
    entries
}
