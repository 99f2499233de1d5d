//! Bounded message history — a fixed-capacity FIFO log of recent
//! messages, used as a local cache before querying the hub.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::types::Message;

pub const DEFAULT_CAPACITY: usize = 1000;
const DEFAULT_RECENT_LIMIT: usize = 50;

/// Insertion-ordered message log; once capacity is exceeded the oldest
/// entry is evicted, so `len() <= capacity` after every append.
#[derive(Debug)]
pub struct MessageHistory {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl MessageHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    pub fn append(&mut self, message: Message) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// The last `limit` messages in arrival order. A limit of zero uses
    /// the default of 50; the limit is clamped to the available size.
    pub fn recent(&self, limit: usize) -> Vec<&Message> {
        let limit = if limit == 0 { DEFAULT_RECENT_LIMIT } else { limit };
        let skip = self.messages.len().saturating_sub(limit);
        self.messages.iter().skip(skip).collect()
    }

    /// Messages with a timestamp strictly after `ts`, in arrival order
    pub fn since(&self, ts: DateTime<Utc>) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.timestamp > ts).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
