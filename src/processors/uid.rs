//! Unique id processor

use crate::core::{LoggerError, Processor, Record, Result};
use rand::Rng;

const HEX: &[u8; 16] = b"0123456789abcdef";

fn random_hex(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}

/// Adds a random hex `uid`, fixed for the lifetime of the processor
///
/// Every record passing through the same instance carries the same id, so
/// records of one process run (or one request, when a processor is created
/// per request) can be correlated.
#[derive(Debug, Clone)]
pub struct UidProcessor {
    uid: String,
}

impl UidProcessor {
    pub const DEFAULT_LENGTH: usize = 7;

    /// `length` hex characters, 1 to 32
    pub fn new(length: usize) -> Result<Self> {
        if !(1..=32).contains(&length) {
            return Err(LoggerError::config(
                "uid processor",
                format!("length must be between 1 and 32, got {}", length),
            ));
        }

        Ok(Self {
            uid: random_hex(length),
        })
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }
}

impl Default for UidProcessor {
    fn default() -> Self {
        Self {
            uid: random_hex(Self::DEFAULT_LENGTH),
        }
    }
}

impl Processor for UidProcessor {
    fn process(&self, mut record: Record) -> Record {
        record.context.insert("uid", self.uid.as_str());
        record
    }

    fn name(&self) -> &str {
        "uid"
    }
}
