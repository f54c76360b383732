//! Append-only file sink

use crate::core::{LoggerError, Record, Result, Sink};
#[cfg(feature = "file")]
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one formatted line per record
///
/// Every write is flushed so records survive a crash of the host process.
/// With the `file` feature, [`FileSink::with_locking`] takes an advisory
/// exclusive lock around each write so several processes can share a file.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    #[cfg(feature = "file")]
    locking: bool,
}

impl FileSink {
    /// Open `path` for appending, creating it if missing
    ///
    /// The parent directory must already exist.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    format!("opening log file '{}'", path.display()),
                    e.to_string(),
                    e,
                )
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            #[cfg(feature = "file")]
            locking: false,
        })
    }

    #[cfg(feature = "file")]
    #[must_use]
    pub fn with_locking(mut self, locking: bool) -> Self {
        self.locking = locking;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(writer: &mut BufWriter<File>, formatted: &str) -> std::io::Result<()> {
        writer.write_all(formatted.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl Sink for FileSink {
    fn write(&self, _record: &Record, formatted: &str) -> Result<()> {
        let mut writer = self.writer.lock();

        #[cfg(feature = "file")]
        if self.locking {
            writer.get_ref().lock_exclusive()?;
            let result = Self::write_line(&mut writer, formatted);
            writer.get_ref().unlock()?;
            return Ok(result?);
        }

        Self::write_line(&mut writer, formatted)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.get_mut().flush();
    }
}
