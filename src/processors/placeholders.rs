//! `{placeholder}` interpolation

use crate::core::{Processor, Record};

/// Replaces `{key}` in the message with the matching context value
///
/// Unknown keys and unbalanced braces are left as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderProcessor;

impl PlaceholderProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for PlaceholderProcessor {
    fn process(&self, mut record: Record) -> Record {
        if !record.message.contains('{') || record.context.is_empty() {
            return record;
        }

        let mut output = String::with_capacity(record.message.len());
        let mut rest = record.message.as_str();

        while let Some(start) = rest.find('{') {
            output.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            match after.find('}') {
                Some(end) => {
                    let key = &after[..end];
                    match record.context.get(key) {
                        Some(value) => output.push_str(&value.to_string()),
                        None => {
                            output.push('{');
                            output.push_str(key);
                            output.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        output.push_str(rest);

        record.message = output;
        record
    }

    fn name(&self) -> &str {
        "message_placeholders"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, Severity};

    fn interpolate(message: &str, context: Context) -> String {
        PlaceholderProcessor
            .process(Record::new(Severity::Info, message).with_context(context))
            .message
    }

    #[test]
    fn test_known_keys_replaced() {
        let context = Context::new().with_field("user", 7).with_field("action", "login");
        assert_eq!(interpolate("user {user} did {action}", context), "user 7 did login");
    }

    #[test]
    fn test_unknown_and_unbalanced_kept() {
        let context = Context::new().with_field("a", 1);
        assert_eq!(interpolate("{a} {missing} {open", context), "1 {missing} {open");
    }

    #[test]
    fn test_multiline_value_escaped_by_line_formatter() {
        use crate::core::Formatter;
        use crate::formatters::LineFormatter;

        let record = PlaceholderProcessor.process(
            Record::new(Severity::Info, "user {user} logged in")
                .with_logger("app")
                .with_context(Context::new().with_field("user", "bob\n[fake] app.CRITICAL: pwned")),
        );
        assert_eq!(record.message, "user bob\n[fake] app.CRITICAL: pwned logged in");

        let line = LineFormatter::new().with_context(false).format(&record).unwrap();
        assert!(!line.contains('\n'));
        assert!(line.ends_with("app.INFO: user bob\\n[fake] app.CRITICAL: pwned logged in"));
    }

    #[test]
    fn test_no_context_is_identity() {
        assert_eq!(interpolate("{a}", Context::new()), "{a}");
    }
}
