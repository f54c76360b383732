//! Structured record context
//!
//! `Context` is an insertion-ordered map of unique keys to `FieldValue`s.
//! Inserting an existing key replaces the value in place, so merging two
//! contexts is last-merge-wins while the first key position is kept.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a TOML scalar; tables and arrays are rendered as strings
    pub fn from_toml(value: &toml::Value) -> Self {
        match value {
            toml::Value::String(s) => FieldValue::String(s.clone()),
            toml::Value::Integer(i) => FieldValue::Int(*i),
            toml::Value::Float(f) => FieldValue::Float(*f),
            toml::Value::Boolean(b) => FieldValue::Bool(*b),
            other => FieldValue::String(other.to_string()),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Insertion-ordered key/value context attached to a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    fields: Vec<(String, FieldValue)>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field, returning the previous value.
    ///
    /// A replaced key keeps its position.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<FieldValue>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(idx).1)
    }

    /// Merge `other` into this context; values from `other` win
    pub fn merge(&mut self, other: Context) {
        for (key, value) in other.fields {
            self.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Format fields as key=value pairs
    pub fn format_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// JSON object with keys in insertion order
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (k, v) in &self.fields {
            map.insert(k.clone(), v.to_json_value());
        }
        serde_json::Value::Object(map)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_context_with_fields() {
        let ctx = Context::new()
            .with_field("user_id", 123)
            .with_field("username", "john_doe")
            .with_field("active", true);

        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx.get("user_id"), Some(&FieldValue::Int(123)));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut ctx = Context::new()
            .with_field("a", 1)
            .with_field("b", 2);

        let previous = ctx.insert("a", 10);
        assert_eq!(previous, Some(FieldValue::Int(1)));
        assert_eq!(ctx.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(ctx.get("a"), Some(&FieldValue::Int(10)));
    }

    #[test]
    fn test_merge_last_wins() {
        let mut base = Context::new()
            .with_field("channel", "caller")
            .with_field("user", 7);
        base.merge(Context::new().with_field("channel", "billing"));

        assert_eq!(base.get("channel").and_then(FieldValue::as_str), Some("billing"));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_context_format_keeps_order() {
        let ctx = Context::new()
            .with_field("key1", "value1")
            .with_field("key2", 42);

        assert_eq!(ctx.format_fields(), "key1=value1 key2=42");
    }

    #[test]
    fn test_serialize_in_order() {
        let ctx = Context::new()
            .with_field("z", 1)
            .with_field("a", "x");
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, r#"{"z":1,"a":"x"}"#);
    }

    #[test]
    fn test_remove() {
        let mut ctx: Context = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(ctx.remove("a"), Some(FieldValue::Int(1)));
        assert!(!ctx.contains_key("a"));
        assert_eq!(ctx.remove("missing"), None);
    }
}
