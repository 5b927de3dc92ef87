//! Sequence-number reorder buffer.

use std::collections::HashMap;

use thiserror::Error;

/// Rejected insertions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    /// The sequence number was already released.
    #[error("Sequence {seq} was already released (next expected: {next_expected})")]
    AlreadyReleased { seq: u64, next_expected: u64 },

    /// The sequence number is already waiting in the buffer.
    #[error("Sequence {seq} is already buffered")]
    Duplicate { seq: u64 },
}

/// Holds items that completed out of order until their predecessors are out.
///
/// Sequence numbers start at 0 and are released contiguously. Checking whether
/// the next expected item is ready is a single hash lookup.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    pending: HashMap<u64, T>,
    next_expected: u64,
    peak: usize,
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReorderBuffer<T> {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            next_expected: 0,
            peak: 0,
        }
    }

    /// Stores a completed item under its sequence number.
    pub fn insert(&mut self, seq: u64, item: T) -> Result<(), ReorderError> {
        if seq < self.next_expected {
            return Err(ReorderError::AlreadyReleased {
                seq,
                next_expected: self.next_expected,
            });
        }
        if self.pending.contains_key(&seq) {
            return Err(ReorderError::Duplicate { seq });
        }
        self.pending.insert(seq, item);
        self.peak = self.peak.max(self.pending.len());
        Ok(())
    }

    /// Removes and returns the next expected item, if it has arrived.
    pub fn pop_next(&mut self) -> Option<(u64, T)> {
        let item = self.pending.remove(&self.next_expected)?;
        let seq = self.next_expected;
        self.next_expected += 1;
        Some((seq, item))
    }

    /// The sequence number that has to be released next.
    ///
    /// Equals the number of items released so far.
    pub fn next_expected(&self) -> u64 {
        self.next_expected
    }

    /// Items currently held.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Largest number of items held at once.
    pub fn peak(&self) -> usize {
        self.peak
    }
}
