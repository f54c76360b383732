//! Rendering of captured errors into diagnostic pages

use crate::core::ErrorReport;
use chrono::{DateTime, Utc};

/// Turns a captured error into a standalone document
pub trait DebugPage: Send + Sync {
    fn render(&self, report: &ErrorReport, rendered_at: DateTime<Utc>) -> String;

    /// File extension of rendered documents, without the dot
    fn extension(&self) -> &str {
        "html"
    }
}

/// Minimal self-contained HTML page
#[derive(Debug, Clone, Default)]
pub struct HtmlDebugPage {
    title: Option<String>,
}

impl HtmlDebugPage {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl DebugPage for HtmlDebugPage {
    fn render(&self, report: &ErrorReport, rendered_at: DateTime<Utc>) -> String {
        let title = self.title.as_deref().unwrap_or(&report.type_name);

        let mut causes = String::new();
        if !report.chain.is_empty() {
            causes.push_str("<h2>Caused by</h2>\n<ol>\n");
            for cause in &report.chain {
                causes.push_str(&format!("<li>{}</li>\n", escape_html(cause)));
            }
            causes.push_str("</ol>\n");
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n\
             <body>\n<h1>{type_name}</h1>\n<p class=\"message\">{message}</p>\n{causes}\
             <footer>{rendered_at}</footer>\n</body>\n</html>\n",
            title = escape_html(title),
            type_name = escape_html(&report.type_name),
            message = escape_html(&report.message),
            causes = causes,
            rendered_at = rendered_at.to_rfc3339(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_escapes_markup() {
        let report = ErrorReport::new("ParseError", "unexpected <script>")
            .with_cause("line 3 & col 7");
        let page = HtmlDebugPage::new().render(&report, Utc::now());

        assert!(page.contains("<h1>ParseError</h1>"));
        assert!(page.contains("unexpected &lt;script&gt;"));
        assert!(page.contains("<li>line 3 &amp; col 7</li>"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_custom_title() {
        let report = ErrorReport::new("E", "m");
        let page = HtmlDebugPage::new().with_title("shop").render(&report, Utc::now());
        assert!(page.contains("<title>shop</title>"));
    }
}
