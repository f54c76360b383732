//! Static tag processor

use crate::core::{Processor, Record};

/// Adds a fixed, comma separated `tags` field
#[derive(Debug, Clone, Default)]
pub struct TagProcessor {
    tags: Vec<String>,
}

impl TagProcessor {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Processor for TagProcessor {
    fn process(&self, mut record: Record) -> Record {
        if !self.tags.is_empty() {
            record.context.insert("tags", self.tags.join(","));
        }
        record
    }

    fn name(&self) -> &str {
        "tag"
    }
}
