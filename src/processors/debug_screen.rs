//! Processors linking records to rendered error pages

use crate::core::{Processor, Record};
use crate::debug_screen::BlueScreenRenderer;
use std::path::Path;
use std::sync::Arc;

/// Context key holding the page file name
pub const DEBUG_SCREEN_KEY: &str = "debug_screen";
/// Context key holding the page URL
pub const DEBUG_SCREEN_URL_KEY: &str = "debug_screen_url";

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Renders the page for records carrying an error
///
/// A page that cannot be written is reported on stderr; the record passes
/// through without the `debug_screen` key.
#[derive(Debug, Clone)]
pub struct DebugScreenExceptionProcessor {
    renderer: Arc<BlueScreenRenderer>,
}

impl DebugScreenExceptionProcessor {
    pub fn new(renderer: Arc<BlueScreenRenderer>) -> Self {
        Self { renderer }
    }
}

impl Processor for DebugScreenExceptionProcessor {
    fn process(&self, mut record: Record) -> Record {
        let Some(report) = record.exception.as_ref() else {
            return record;
        };

        match self.renderer.log_exception(report) {
            Ok(path) => {
                record.context.insert(DEBUG_SCREEN_KEY, file_name(&path));
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to render debug page: {}", e);
            }
        }
        record
    }

    fn name(&self) -> &str {
        "debug_screen_exception"
    }
}

/// Adds `debug_screen_url = <base>/<page file>` for records carrying an error
///
/// The page name comes from the renderer, so the URL is known even when
/// this processor runs before the page is written.
#[derive(Debug, Clone)]
pub struct DebugScreenUrlProcessor {
    base_url: String,
    renderer: Arc<BlueScreenRenderer>,
}

impl DebugScreenUrlProcessor {
    pub fn new(base_url: impl Into<String>, renderer: Arc<BlueScreenRenderer>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, renderer }
    }
}

impl Processor for DebugScreenUrlProcessor {
    fn process(&self, mut record: Record) -> Record {
        let Some(report) = record.exception.as_ref() else {
            return record;
        };

        let page = file_name(&self.renderer.exception_file(report));
        record
            .context
            .insert(DEBUG_SCREEN_URL_KEY, format!("{}/{}", self.base_url, page));
        record
    }

    fn name(&self) -> &str {
        "debug_screen_url"
    }
}
