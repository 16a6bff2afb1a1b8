//! Message ID Generator
//!
//! Process-wide unique message identifiers.
//!
//! Format: `<unix-nanos>_<sequence>_<random>`. The sequence comes from a
//! single atomic counter, so two IDs produced by the same process can never
//! collide even when the clock does not advance between calls.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use once_cell::sync::Lazy;

/// Generator shared by every producer of messages in the process.
static GLOBAL: Lazy<MessageIdGenerator> = Lazy::new(MessageIdGenerator::new);

/// Message ID generator
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    sequence: AtomicU64,
}

impl MessageIdGenerator {
    /// Create a new generator with its sequence at zero
    pub fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
        }
    }

    /// Generate a new message ID
    pub fn generate(&self) -> String {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let random: u16 = rand::random();

        format!("{}_{}_{}", nanos, sequence, random)
    }
}

/// Generate a message ID from the process-wide generator
pub fn next_id() -> String {
    GLOBAL.generate()
}
