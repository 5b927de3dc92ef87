//! Mock production line for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::line::ProductionLine;
use crate::sheet::Sheet;

/// Production line that records how the pipeline drives it.
///
/// Tracks:
/// - every fetch call, and fetch calls made after end of stream
/// - the order sheets come back in
/// - how often each sheet id came back
/// - whether every returned sheet had all its queries answered
#[derive(Debug)]
pub struct MockLine {
    name: String,
    pending: Mutex<VecDeque<Sheet>>,
    fetch_delay: Option<Duration>,
    fetch_calls: AtomicUsize,
    fetches_after_end: AtomicUsize,
    ended: AtomicBool,
    returned_ids: Mutex<Vec<u64>>,
    return_counts: Mutex<HashMap<u64, usize>>,
    unanalyzed_returns: AtomicUsize,
}

impl MockLine {
    /// Create a line that emits `sheets` in order.
    pub fn new(name: impl Into<String>, sheets: Vec<Sheet>) -> Self {
        Self {
            name: name.into(),
            pending: Mutex::new(sheets.into()),
            fetch_delay: None,
            fetch_calls: AtomicUsize::new(0),
            fetches_after_end: AtomicUsize::new(0),
            ended: AtomicBool::new(false),
            returned_ids: Mutex::new(Vec::new()),
            return_counts: Mutex::new(HashMap::new()),
            unanalyzed_returns: AtomicUsize::new(0),
        }
    }

    /// Sleep before every fetch, simulating a slow source.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Total `fetch_sheet` calls, including the one that saw end of stream.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// `fetch_sheet` calls made after end of stream was reported.
    pub fn fetches_after_end(&self) -> usize {
        self.fetches_after_end.load(Ordering::SeqCst)
    }

    /// Ids of returned sheets, in return order.
    pub fn returned_ids(&self) -> Vec<u64> {
        self.returned_ids.lock().clone()
    }

    /// How many times the sheet with `id` came back.
    pub fn return_count(&self, id: u64) -> usize {
        self.return_counts.lock().get(&id).copied().unwrap_or(0)
    }

    /// True when every returned sheet carried a result for each query.
    pub fn all_returned_analyzed(&self) -> bool {
        self.unanalyzed_returns.load(Ordering::SeqCst) == 0
    }

    /// True once the source reported end of stream.
    pub fn has_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }
}

impl ProductionLine for MockLine {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_sheet(&self) -> Option<Sheet> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.ended.load(Ordering::SeqCst) {
            self.fetches_after_end.fetch_add(1, Ordering::SeqCst);
            return None;
        }
        if let Some(delay) = self.fetch_delay {
            std::thread::sleep(delay);
        }

        let next = self.pending.lock().pop_front();
        if next.is_none() {
            self.ended.store(true, Ordering::SeqCst);
        }
        next
    }

    fn done_sheet(&self, sheet: Sheet) {
        if !sheet.is_analyzed() {
            self.unanalyzed_returns.fetch_add(1, Ordering::SeqCst);
        }
        *self.return_counts.lock().entry(sheet.id()).or_insert(0) += 1;
        self.returned_ids.lock().push(sheet.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_mock_line_counts_fetches_after_end() {
        let line = MockLine::new("a", fixtures::sheets(0, 1));
        assert!(line.fetch_sheet().is_some());
        assert!(line.fetch_sheet().is_none());
        assert!(line.has_ended());
        assert!(line.fetch_sheet().is_none());

        assert_eq!(line.fetch_calls(), 3);
        assert_eq!(line.fetches_after_end(), 1);
    }

    #[test]
    fn test_mock_line_records_returns() {
        let line = MockLine::new("b", Vec::new());
        line.done_sheet(fixtures::sheet(4));
        line.done_sheet(fixtures::sheet(4));

        assert_eq!(line.returned_ids(), vec![4, 4]);
        assert_eq!(line.return_count(4), 2);
        assert_eq!(line.return_count(5), 0);
        // Fixture sheets carry unanswered queries.
        assert!(!line.all_returned_analyzed());
    }
}
