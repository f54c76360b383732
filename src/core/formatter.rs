//! Formatter trait for rendering records before emission

use super::error::Result;
use super::record::Record;

/// Renders a finished record into the text a sink writes.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &Record) -> Result<String>;
    fn name(&self) -> &str;
}
