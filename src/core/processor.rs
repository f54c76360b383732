//! Processor trait and ordered processor chains

use super::priority::Priority;
use super::record::Record;
use std::fmt;
use std::sync::Arc;

/// Transformation applied to a record before it reaches handlers.
///
/// Processors are expected not to fail; a panicking processor is a bug and
/// the panic propagates to the caller of `log`.
pub trait Processor: Send + Sync {
    fn process(&self, record: Record) -> Record;
    fn name(&self) -> &str;
}

/// Adapter turning a closure into a named processor
pub struct FnProcessor<F> {
    name: String,
    func: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(Record) -> Record + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Processor for FnProcessor<F>
where
    F: Fn(Record) -> Record + Send + Sync,
{
    fn process(&self, record: Record) -> Record {
        (self.func)(record)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A processor attached to a logger or handler
#[derive(Clone)]
pub struct ProcessorEntry {
    pub id: String,
    pub priority: Priority,
    pub processor: Arc<dyn Processor>,
}

impl ProcessorEntry {
    pub fn new(id: impl Into<String>, processor: Arc<dyn Processor>) -> Self {
        Self {
            id: id.into(),
            priority: Priority::DEFAULT,
            processor,
        }
    }

    /// Wrap a closure as an entry with default priority
    pub fn from_fn<F>(id: impl Into<String>, func: F) -> Self
    where
        F: Fn(Record) -> Record + Send + Sync + 'static,
    {
        let id = id.into();
        let processor = Arc::new(FnProcessor::new(id.clone(), func));
        Self::new(id, processor)
    }

    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }
}

impl fmt::Debug for ProcessorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorEntry")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("processor", &self.processor.name())
            .finish()
    }
}

/// Ordered list of processors; each sees the output of the previous one
#[derive(Debug, Clone, Default)]
pub struct ProcessorChain {
    entries: Vec<ProcessorEntry>,
}

impl ProcessorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ProcessorEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: ProcessorEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<ProcessorEntry> {
        self.entries.pop()
    }

    pub fn entries(&self) -> &[ProcessorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every processor in attachment order
    pub fn apply(&self, record: Record) -> Record {
        apply_all(&self.entries, record)
    }
}

pub(crate) fn apply_all(entries: &[ProcessorEntry], record: Record) -> Record {
    entries
        .iter()
        .fold(record, |record, entry| entry.processor.process(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldValue, Severity};

    fn append_step(step: &'static str) -> ProcessorEntry {
        ProcessorEntry::from_fn(step, move |mut record: Record| {
            let trail = match record.context.get("trail") {
                Some(FieldValue::String(s)) => format!("{}>{}", s, step),
                _ => step.to_string(),
            };
            record.context.insert("trail", trail);
            record
        })
    }

    #[test]
    fn test_chain_runs_in_order() {
        let mut chain = ProcessorChain::new();
        chain.push(append_step("first"));
        chain.push(append_step("second"));
        chain.push(append_step("third"));

        let record = chain.apply(Record::new(Severity::Info, "x"));
        assert_eq!(
            record.context.get("trail"),
            Some(&FieldValue::String("first>second>third".into()))
        );
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = ProcessorChain::new();
        let record = chain.apply(Record::new(Severity::Notice, "unchanged"));
        assert_eq!(record.message, "unchanged");
        assert!(record.context.is_empty());
    }

    #[test]
    #[should_panic(expected = "processor bug")]
    fn test_processor_panic_propagates() {
        let mut chain = ProcessorChain::new();
        chain.push(ProcessorEntry::from_fn("broken", |_record: Record| -> Record {
            panic!("processor bug")
        }));
        chain.apply(Record::new(Severity::Info, "x"));
    }

    #[test]
    fn test_pop_returns_last() {
        let mut chain = ProcessorChain::new();
        chain.push(append_step("a"));
        chain.push(append_step("b").with_priority(3));
        let popped = chain.pop().unwrap();
        assert_eq!(popped.id, "b");
        assert_eq!(popped.priority, Priority(3));
        assert_eq!(chain.len(), 1);
    }
}
