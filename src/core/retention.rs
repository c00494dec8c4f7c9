// LogSieve - core/retention.rs
//
// Bounded retention buffer for display sinks: keeps either the first N or
// the last N items offered to it.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::demux::LineSink;
use crate::util::error::RetentionError;
use std::collections::VecDeque;
use std::io;

/// Which items a full buffer keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionMode {
    /// Keep the first `capacity` items; later items are dropped silently.
    KeepFirst,
    /// Keep the most recent `capacity` items; the oldest is evicted.
    KeepLast,
}

impl RetentionMode {
    pub fn from_keep_first(keep_first: bool) -> Self {
        if keep_first {
            Self::KeepFirst
        } else {
            Self::KeepLast
        }
    }
}

/// A fixed-capacity buffer. Never holds more than `capacity` items.
#[derive(Debug, Clone)]
pub struct RetentionBuffer<T> {
    capacity: usize,
    mode: RetentionMode,
    items: VecDeque<T>,
}

impl<T> RetentionBuffer<T> {
    pub fn new(capacity: usize, mode: RetentionMode) -> Result<Self, RetentionError> {
        if capacity == 0 {
            return Err(RetentionError::InvalidCapacity { capacity });
        }
        Ok(Self {
            capacity,
            mode,
            items: VecDeque::with_capacity(capacity),
        })
    }

    /// Offer an item.
    ///
    /// In `KeepFirst` mode a full buffer ignores the item without signalling
    /// anything. In `KeepLast` mode the oldest held item is evicted.
    pub fn add(&mut self, item: T) {
        match self.mode {
            RetentionMode::KeepFirst => {
                if self.items.len() < self.capacity {
                    self.items.push_back(item);
                }
            }
            RetentionMode::KeepLast => {
                if self.items.len() == self.capacity {
                    self.items.pop_front();
                }
                self.items.push_back(item);
            }
        }
    }

    /// Held items, oldest retained first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Empty the buffer. A full `KeepFirst` buffer accepts items again.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True once the buffer holds `capacity` items. For `KeepFirst` this is
    /// the point from which every `add` is a no-op until `clear`.
    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mode(&self) -> RetentionMode {
        self.mode
    }
}

impl<T: Clone> RetentionBuffer<T> {
    /// Snapshot of the held items in retention order.
    pub fn get(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl LineSink for RetentionBuffer<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.add(line.to_string());
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}
