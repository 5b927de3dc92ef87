//! In-memory production line.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::traits::ProductionLine;
use crate::sheet::Sheet;

/// A production line backed by a queue of pending sheets.
///
/// Returned sheets are collected in the order they arrive.
#[derive(Debug)]
pub struct QueueLine {
    name: String,
    total: usize,
    pending: Mutex<VecDeque<Sheet>>,
    returned: Mutex<Vec<Sheet>>,
}

impl QueueLine {
    /// Creates a line that will emit `sheets` in iteration order.
    pub fn new(name: impl Into<String>, sheets: impl IntoIterator<Item = Sheet>) -> Self {
        let pending: VecDeque<Sheet> = sheets.into_iter().collect();
        Self {
            name: name.into(),
            total: pending.len(),
            pending: Mutex::new(pending),
            returned: Mutex::new(Vec::new()),
        }
    }

    /// Number of sheets the line was created with.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of sheets still waiting to be fetched.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Number of sheets handed back so far.
    pub fn returned_count(&self) -> usize {
        self.returned.lock().len()
    }

    /// Clones of the returned sheets, in return order.
    pub fn returned(&self) -> Vec<Sheet> {
        self.returned.lock().clone()
    }

    /// Takes the returned sheets out of the line.
    pub fn take_returned(&self) -> Vec<Sheet> {
        std::mem::take(&mut *self.returned.lock())
    }

    /// True once every sheet has been fetched and handed back.
    pub fn is_complete(&self) -> bool {
        self.pending.lock().is_empty() && self.returned.lock().len() == self.total
    }
}

impl ProductionLine for QueueLine {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_sheet(&self) -> Option<Sheet> {
        self.pending.lock().pop_front()
    }

    fn done_sheet(&self, sheet: Sheet) {
        self.returned.lock().push(sheet);
    }
}
