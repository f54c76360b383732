//! Logfmt formatter (key=value pairs)

use super::escape_control;
use super::timestamp::TimestampFormat;
use crate::core::{FieldValue, Formatter, Record, Result};

/// `timestamp=... level=ERROR channel=app message="boom" user=7`
#[derive(Debug, Clone, Default)]
pub struct LogfmtFormatter {
    timestamp_format: TimestampFormat,
}

impl LogfmtFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Keys keep only characters that need no quoting
    fn escape_key(key: &str) -> String {
        key.chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
            .collect()
    }

    fn escape_value(value: &str) -> String {
        let needs_quotes = value.is_empty()
            || value.contains(|c: char| matches!(c, ' ' | '"' | '=') || c.is_control());
        if needs_quotes {
            Self::quote(value)
        } else {
            value.to_string()
        }
    }

    fn quote(value: &str) -> String {
        format!(
            "\"{}\"",
            escape_control(&value.replace('\\', "\\\\").replace('"', "\\\""))
        )
    }
}

impl Formatter for LogfmtFormatter {
    fn format(&self, record: &Record) -> Result<String> {
        let mut parts = vec![
            format!(
                "timestamp={}",
                Self::escape_value(&self.timestamp_format.format(&record.timestamp))
            ),
            format!("level={}", record.level.to_str()),
            format!("channel={}", Self::escape_value(record.channel_or_logger())),
            // always quoted
            format!("message={}", Self::quote(&record.message)),
        ];

        for (key, value) in record.context.iter() {
            let formatted = match value {
                FieldValue::String(s) => Self::quote(s),
                other => other.to_string(),
            };
            parts.push(format!("{}={}", Self::escape_key(key), formatted));
        }

        if let Some(ref exception) = record.exception {
            parts.push(format!("exception={}", Self::quote(&exception.message)));
        }

        Ok(parts.join(" "))
    }

    fn name(&self) -> &str {
        "logfmt"
    }
}
