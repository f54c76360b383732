//! In-memory sink for capture and tests

use crate::core::{Record, Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Captured {
    records: Vec<Record>,
    lines: Vec<String>,
}

/// Shared buffer of captured records
///
/// Clones share the same storage, so a test can keep one clone and hand the
/// other to a [`MemorySink`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    inner: Arc<Mutex<Captured>>,
}

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in arrival order
    pub fn records(&self) -> Vec<Record> {
        self.inner.lock().records.clone()
    }

    /// Formatted lines in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.inner.lock().lines.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut captured = self.inner.lock();
        captured.records.clear();
        captured.lines.clear();
    }

    fn push(&self, record: &Record, formatted: &str) {
        let mut captured = self.inner.lock();
        captured.records.push(record.clone());
        captured.lines.push(formatted.to_string());
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: MemoryBuffer,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer(buffer: MemoryBuffer) -> Self {
        Self { buffer }
    }

    pub fn buffer(&self) -> &MemoryBuffer {
        &self.buffer
    }
}

impl Sink for MemorySink {
    fn write(&self, record: &Record, formatted: &str) -> Result<()> {
        self.buffer.push(record, formatted);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
