//! JSON formatter for structured logging
//!
//! Writes each record as a single-line JSON object (JSONL format),
//! compatible with log aggregation tools like ELK, Loki, etc.

use crate::core::{Formatter, Record, Result};

#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Multi-line output, for humans reading a file
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &Record) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(record)?
        } else {
            serde_json::to_string(record)?
        };
        Ok(json)
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, Severity};

    #[test]
    fn test_json_fields() -> Result<()> {
        let record = Record::new(Severity::Error, "boom")
            .with_logger("app")
            .with_channel("billing")
            .with_context(Context::new().with_field("user", 7));

        let line = JsonFormatter::new().format(&record)?;
        assert!(!line.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&line)?;
        assert_eq!(parsed["message"], "boom");
        assert_eq!(parsed["level"], "error");
        assert_eq!(parsed["channel"], "billing");
        assert_eq!(parsed["logger"], "app");
        assert_eq!(parsed["context"]["user"], 7);
        Ok(())
    }

    #[test]
    fn test_json_keeps_message_text() -> Result<()> {
        let record = Record::new(Severity::Error, "line1\nline2\ttab").with_logger("app");
        let line = JsonFormatter::new().format(&record)?;
        assert!(!line.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&line)?;
        assert_eq!(parsed["message"], "line1\nline2\ttab");
        Ok(())
    }

    #[test]
    fn test_pretty_is_multiline() -> Result<()> {
        let record = Record::new(Severity::Info, "hello").with_logger("app");
        let out = JsonFormatter::pretty().format(&record)?;
        assert!(out.contains('\n'));
        Ok(())
    }
}
