//! Human-readable single-line formatter

use super::escape_control;
use super::timestamp::TimestampFormat;
use crate::core::{Formatter, Record, Result};

/// `[timestamp] channel.LEVEL: message key=value ...`
///
/// Line breaks and tabs in the message, context and exception text are
/// escaped, so every record produces exactly one line.
///
/// The channel slot shows the record's channel tag, or the logger name for
/// records emitted on a top-level logger.
#[derive(Debug, Clone)]
pub struct LineFormatter {
    timestamp_format: TimestampFormat,
    include_context: bool,
}

impl LineFormatter {
    pub fn new() -> Self {
        Self {
            timestamp_format: TimestampFormat::default(),
            include_context: true,
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_context(mut self, include: bool) -> Self {
        self.include_context = include;
        self
    }
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for LineFormatter {
    fn format(&self, record: &Record) -> Result<String> {
        let mut output = format!(
            "[{}] {}.{}: {}",
            self.timestamp_format.format(&record.timestamp),
            escape_control(record.channel_or_logger()),
            record.level.to_str(),
            escape_control(&record.message)
        );

        if self.include_context && !record.context.is_empty() {
            output.push(' ');
            output.push_str(&escape_control(&record.context.format_fields()));
        }

        if let Some(ref exception) = record.exception {
            output.push_str(&format!(
                " [{}: {}]",
                exception.type_name,
                escape_control(&exception.message)
            ));
        }

        Ok(output)
    }

    fn name(&self) -> &str {
        "line"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, ErrorReport, Severity};

    #[test]
    fn test_line_with_channel_and_context() {
        let record = Record::new(Severity::Warning, "disk almost full")
            .with_logger("app")
            .with_channel("storage")
            .with_context(Context::new().with_field("free_mb", 12));

        let line = LineFormatter::new().format(&record).unwrap();
        assert!(line.contains("storage.WARNING: disk almost full free_mb=12"));
        assert!(line.starts_with('['));
    }

    #[test]
    fn test_line_uses_logger_name_without_channel() {
        let record = Record::new(Severity::Info, "started").with_logger("app");
        let line = LineFormatter::new().with_context(false).format(&record).unwrap();
        assert!(line.ends_with("app.INFO: started"));
    }

    #[test]
    fn test_line_includes_exception() {
        let record = Record::new(Severity::Critical, "failed")
            .with_logger("app")
            .with_exception(ErrorReport::new("io::Error", "broken pipe"));
        let line = LineFormatter::new().format(&record).unwrap();
        assert!(line.ends_with("[io::Error: broken pipe]"));
    }

    #[test]
    fn test_line_escapes_injected_lines() {
        let record = Record::new(Severity::Info, "line one\nERROR fake\r\tend")
            .with_logger("app")
            .with_context(Context::new().with_field("note", "a\nb"));
        let line = LineFormatter::new().format(&record).unwrap();
        assert!(!line.contains('\n'));
        assert!(!line.contains('\r'));
        assert!(line.contains("app.INFO: line one\\nERROR fake\\r\\tend note=a\\nb"));
        assert_eq!(record.message, "line one\nERROR fake\r\tend");
    }
}
