//! Formatter implementations

pub mod json;
pub mod line;
pub mod logfmt;
pub mod timestamp;

pub use json::JsonFormatter;
pub use line::LineFormatter;
pub use logfmt::LogfmtFormatter;
pub use timestamp::TimestampFormat;

pub use crate::core::Formatter;

/// Escape line breaks and tabs so one record stays on one output line
///
/// Applied by the single-line formatters to the final message, which covers
/// text added by processors as well as the caller's own.
pub(crate) fn escape_control(text: &str) -> String {
    if !text.contains(|c| matches!(c, '\n' | '\r' | '\t')) {
        return text.to_string();
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
