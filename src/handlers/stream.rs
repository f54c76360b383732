//! Standard stream sink

use crate::core::{Record, Result, Severity, Sink};
#[cfg(feature = "console")]
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Which standard stream a [`StreamSink`] writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamTarget {
    Stdout,
    Stderr,
    /// Error and above to stderr, everything else to stdout
    #[default]
    Auto,
}

impl FromStr for StreamTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(StreamTarget::Stdout),
            "stderr" => Ok(StreamTarget::Stderr),
            "auto" => Ok(StreamTarget::Auto),
            other => Err(format!(
                "Invalid stream '{}', expected stdout, stderr or auto",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StreamSink {
    target: StreamTarget,
    use_colors: bool,
}

impl StreamSink {
    pub fn new(target: StreamTarget) -> Self {
        Self {
            target,
            use_colors: false,
        }
    }

    pub fn stdout() -> Self {
        Self::new(StreamTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(StreamTarget::Stderr)
    }

    /// Colour lines by level; a no-op without the `console` feature
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn target(&self) -> StreamTarget {
        self.target
    }

    fn to_stderr(&self, level: Severity) -> bool {
        match self.target {
            StreamTarget::Stdout => false,
            StreamTarget::Stderr => true,
            StreamTarget::Auto => level.is_error(),
        }
    }

    #[cfg(feature = "console")]
    fn paint(&self, level: Severity, formatted: &str) -> String {
        if self.use_colors {
            formatted.color(level.color_code()).to_string()
        } else {
            formatted.to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn paint(&self, _level: Severity, formatted: &str) -> String {
        formatted.to_string()
    }
}

impl Default for StreamSink {
    fn default() -> Self {
        Self::new(StreamTarget::Auto)
    }
}

impl Sink for StreamSink {
    fn write(&self, record: &Record, formatted: &str) -> Result<()> {
        let line = self.paint(record.level, formatted);
        if self.to_stderr(record.level) {
            writeln!(std::io::stderr().lock(), "{}", line)?;
        } else {
            writeln!(std::io::stdout().lock(), "{}", line)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // Flush both since Auto writes to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            StreamTarget::Stdout => "stdout",
            StreamTarget::Stderr => "stderr",
            StreamTarget::Auto => "console",
        }
    }
}
