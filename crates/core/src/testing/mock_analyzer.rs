//! Instrumented analyzer for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::analysis::{MaxRectAnalyzer, SheetAnalyzer};
use crate::sheet::Sheet;

/// Wraps [`MaxRectAnalyzer`] with latency injection and bookkeeping.
///
/// Provides:
/// - a per-sheet delay (by sheet id) on top of a default delay
/// - a concurrent-entry counter and its observed peak
/// - per-sheet call counts
/// - the order in which analyses finished
///
/// Sheet ids are used as keys, so sheets across lines sharing one analyzer
/// should have distinct ids.
#[derive(Debug, Default)]
pub struct InstrumentedAnalyzer {
    inner: MaxRectAnalyzer,
    default_delay: Duration,
    delays: HashMap<u64, Duration>,
    running: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<HashMap<u64, usize>>,
    completion_order: Mutex<Vec<u64>>,
}

impl InstrumentedAnalyzer {
    /// Create an analyzer without injected latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay applied to every sheet without a specific delay.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Delay applied to the sheet with `id`.
    pub fn with_delay_for(mut self, id: u64, delay: Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    /// Highest number of analyses observed running at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// How many times the sheet with `id` was analyzed.
    pub fn calls_for(&self, id: u64) -> usize {
        self.calls.lock().get(&id).copied().unwrap_or(0)
    }

    /// Total analyses performed.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    /// Sheet ids in the order their analysis finished.
    pub fn completion_order(&self) -> Vec<u64> {
        self.completion_order.lock().clone()
    }
}

impl SheetAnalyzer for InstrumentedAnalyzer {
    fn name(&self) -> &str {
        "instrumented"
    }

    fn analyze(&self, sheet: &mut Sheet) {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        *self.calls.lock().entry(sheet.id()).or_insert(0) += 1;

        let delay = self
            .delays
            .get(&sheet.id())
            .copied()
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.inner.analyze(sheet);

        self.completion_order.lock().push(sheet.id());
        self.running.fetch_sub(1, Ordering::SeqCst);
    }
}
