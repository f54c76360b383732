//! Process id processor

use crate::core::{Processor, Record};

/// Adds `process_id` to every record
#[derive(Debug, Clone, Copy)]
pub struct ProcessIdProcessor {
    pid: u32,
}

impl ProcessIdProcessor {
    pub fn new() -> Self {
        Self {
            pid: std::process::id(),
        }
    }
}

impl Default for ProcessIdProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for ProcessIdProcessor {
    fn process(&self, mut record: Record) -> Record {
        record.context.insert("process_id", self.pid);
        record
    }

    fn name(&self) -> &str {
        "process_id"
    }
}
