//! Writes diagnostic pages for captured errors into the log directory

use super::page::{DebugPage, HtmlDebugPage};
use crate::core::{ErrorReport, LoggerError, Result, Severity};
use chrono::Utc;
use parking_lot::Mutex;
use md5::{Digest, Md5};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const FILE_PREFIX: &str = "exception--";

/// Renders errors to `exception--<date>--<hash>.<ext>` files
///
/// The same error (type, message and causes) always maps to the same file:
/// an existing page for its hash is reused instead of writing a new one.
/// The renderer is single-purpose; [`BlueScreenRenderer::log`] is rejected.
pub struct BlueScreenRenderer {
    directory: PathBuf,
    page: Arc<dyn DebugPage>,
    assigned: Mutex<HashMap<String, PathBuf>>,
}

impl BlueScreenRenderer {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_page(directory, Arc::new(HtmlDebugPage::new()))
    }

    pub fn with_page(directory: impl Into<PathBuf>, page: Arc<dyn DebugPage>) -> Self {
        Self {
            directory: directory.into(),
            page,
            assigned: Mutex::new(HashMap::new()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// MD5 hex digest of the error identity
    ///
    /// Each part is followed by a NUL byte, so the digest does not depend on
    /// the toolchain and pages stay reusable across restarts.
    pub fn report_hash(report: &ErrorReport) -> String {
        let mut hasher = Md5::new();
        let parts = [report.type_name.as_str(), report.message.as_str()]
            .into_iter()
            .chain(report.chain.iter().map(String::as_str));
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }

        hasher.finalize().iter().fold(String::with_capacity(32), |mut hex, byte| {
            let _ = write!(hex, "{:02x}", byte);
            hex
        })
    }

    /// Path of the page for `report`, reusing an existing one
    ///
    /// Does not write anything; see [`BlueScreenRenderer::render_to_file`].
    pub fn exception_file(&self, report: &ErrorReport) -> PathBuf {
        let hash = Self::report_hash(report);
        let mut assigned = self.assigned.lock();

        if let Some(path) = assigned.get(&hash) {
            return path.clone();
        }

        let path = self.find_existing(&hash).unwrap_or_else(|| {
            self.directory.join(format!(
                "{}{}--{}.{}",
                FILE_PREFIX,
                Utc::now().format("%Y-%m-%d--%H-%M"),
                hash,
                self.page.extension()
            ))
        });
        assigned.insert(hash, path.clone());
        path
    }

    fn find_existing(&self, hash: &str) -> Option<PathBuf> {
        let suffix = format!("--{}.{}", hash, self.page.extension());
        fs::read_dir(&self.directory)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(FILE_PREFIX) && name.ends_with(&suffix))
            })
    }

    /// Render `report` into `file` unless the file already exists
    pub fn render_to_file(&self, report: &ErrorReport, file: &Path) -> Result<PathBuf> {
        let content = self.page.render(report, Utc::now());

        match OpenOptions::new().write(true).create_new(true).open(file) {
            Ok(mut handle) => {
                handle.write_all(content.as_bytes()).map_err(|e| {
                    LoggerError::io_operation(
                        format!("writing debug page '{}'", file.display()),
                        e.to_string(),
                        e,
                    )
                })?;
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(LoggerError::io_operation(
                    format!("creating debug page '{}'", file.display()),
                    e.to_string(),
                    e,
                ))
            }
        }

        Ok(file.to_path_buf())
    }

    /// Resolve the page path for `report` and make sure it is written
    pub fn log_exception(&self, report: &ErrorReport) -> Result<PathBuf> {
        let file = self.exception_file(report);
        self.render_to_file(report, &file)
    }

    /// Generic message logging is not offered by the renderer
    pub fn log(&self, _message: &str, _level: Severity) -> Result<Option<PathBuf>> {
        Err(LoggerError::unsupported(
            "BlueScreenRenderer",
            "log (only renders errors to files)",
        ))
    }
}

impl std::fmt::Debug for BlueScreenRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlueScreenRenderer")
            .field("directory", &self.directory)
            .finish()
    }
}
