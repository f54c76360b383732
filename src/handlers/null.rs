//! Sink that discards everything

use crate::core::{Record, Result, Sink};

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn write(&self, _record: &Record, _formatted: &str) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
