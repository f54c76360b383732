//! Timestamp rendering for text formatters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Timestamp format used by the line and logfmt formatters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// RFC 3339 with offset: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Any strftime-compatible format string
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    /// Named formats, or a strftime pattern when the string contains `%`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iso8601" => Ok(TimestampFormat::Iso8601),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            "unix_millis" | "unixmillis" => Ok(TimestampFormat::UnixMillis),
            _ if s.contains('%') => Ok(TimestampFormat::Custom(s.to_string())),
            _ => Err(format!("Invalid timestamp format: '{}'", s)),
        }
    }
}
