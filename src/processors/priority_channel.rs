//! Channel promotion from context

use crate::core::{Processor, Record, Severity, CHANNEL_KEY};

/// Context key whose non-severity value renames the record's channel
pub const PRIORITY_KEY: &str = "priority";

/// Moves provenance hints from the context onto [`Record::channel`]
///
/// * `context.channel` becomes the record's channel; the context key stays
///   so handlers and formatters can still read it.
/// * Otherwise a `context.priority` that does not name a severity (for
///   example `"access"`) becomes the channel and is removed from the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityChannelProcessor;

impl PriorityChannelProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for PriorityChannelProcessor {
    fn process(&self, mut record: Record) -> Record {
        if let Some(channel) = record.context.get(CHANNEL_KEY) {
            record.channel = Some(channel.to_string());
            return record;
        }

        let rename = record
            .context
            .get(PRIORITY_KEY)
            .map(|priority| priority.to_string());

        if let Some(priority) = rename {
            if priority.parse::<Severity>().is_err() {
                record.channel = Some(priority.to_lowercase());
            }
            record.context.remove(PRIORITY_KEY);
        }

        record
    }

    fn name(&self) -> &str {
        "priority_channel"
    }
}
