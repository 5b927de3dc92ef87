//! Quality control lifecycle integration tests.
//!
//! These tests drive the controller with mock lines and an instrumented
//! analyzer:
//! - Completeness for empty, single-sheet and multi-sheet lines
//! - Worker capacity shared across lines
//! - Independence between lines
//! - The join barrier in `stop`

use std::sync::Arc;
use std::time::{Duration, Instant};

use sheetline_core::{
    testing::{fixtures, InstrumentedAnalyzer, MockLine},
    LineState, ProductionLine, QualityControl, QueueLine,
};

/// Test helper owning a controller driven by an instrumented analyzer.
struct TestHarness {
    control: QualityControl<InstrumentedAnalyzer>,
}

impl TestHarness {
    fn new(analyzer: InstrumentedAnalyzer) -> Self {
        Self {
            control: QualityControl::new(analyzer),
        }
    }

    fn add_line(&mut self, line: MockLine) -> Arc<MockLine> {
        let line = Arc::new(line);
        self.control
            .add_line(Arc::clone(&line) as Arc<dyn ProductionLine>)
            .expect("Failed to add line");
        line
    }

    fn run(&mut self, worker_threads: usize) {
        self.control
            .start(worker_threads)
            .expect("Failed to start control");
        self.control.stop().expect("Failed to stop control");
    }

    fn analyzer(&self) -> &InstrumentedAnalyzer {
        self.control.analyzer()
    }
}

#[test]
fn test_empty_line_finishes_without_returns() {
    let mut harness = TestHarness::new(InstrumentedAnalyzer::new());
    let line = harness.add_line(MockLine::new("empty", Vec::new()));

    harness.run(2);

    assert!(line.returned_ids().is_empty());
    assert_eq!(line.fetch_calls(), 1);
    assert_eq!(line.fetches_after_end(), 0);
    assert_eq!(harness.analyzer().total_calls(), 0);
    assert_eq!(harness.control.status().lines[0].state, LineState::Finished);
}

#[test]
fn test_single_sheet_line() {
    let mut harness = TestHarness::new(InstrumentedAnalyzer::new());
    let line = harness.add_line(MockLine::new("single", fixtures::sheets(7, 1)));

    harness.run(3);

    assert_eq!(line.returned_ids(), vec![7]);
    assert!(line.all_returned_analyzed());
    assert_eq!(harness.analyzer().calls_for(7), 1);
}

#[test]
fn test_every_sheet_returned_exactly_once() {
    let mut harness = TestHarness::new(
        InstrumentedAnalyzer::new().with_default_delay(Duration::from_millis(1)),
    );
    let line = harness.add_line(MockLine::new("many", fixtures::sheets(0, 40)));

    harness.run(4);

    assert_eq!(line.returned_ids().len(), 40);
    for id in 0..40 {
        assert_eq!(line.return_count(id), 1, "sheet {} returned wrong number of times", id);
        assert_eq!(harness.analyzer().calls_for(id), 1, "sheet {} analyzed wrong number of times", id);
    }
    assert!(line.all_returned_analyzed());
    assert_eq!(line.fetches_after_end(), 0);
}

#[test]
fn test_capacity_shared_across_lines() {
    let mut harness = TestHarness::new(
        InstrumentedAnalyzer::new().with_default_delay(Duration::from_millis(5)),
    );
    let lines: Vec<_> = (0..3)
        .map(|i| {
            harness.add_line(MockLine::new(
                format!("line-{}", i),
                fixtures::sheets(i * 1000, 10),
            ))
        })
        .collect();

    harness.run(2);

    assert!(harness.analyzer().peak_concurrency() <= 2);
    assert!(harness.analyzer().peak_concurrency() >= 1);
    for line in &lines {
        assert_eq!(line.returned_ids().len(), 10);
    }

    let pool = harness.control.status().pool.expect("pool exists after start");
    assert!(pool.peak_active <= 2);
    assert_eq!(pool.total_completed, 30);
}

#[test]
fn test_single_worker_processes_sequentially() {
    let mut harness = TestHarness::new(
        InstrumentedAnalyzer::new().with_default_delay(Duration::from_millis(2)),
    );
    let line = harness.add_line(MockLine::new("sequential", fixtures::sheets(0, 5)));

    harness.run(1);

    assert_eq!(harness.analyzer().peak_concurrency(), 1);
    assert_eq!(harness.analyzer().completion_order(), vec![0, 1, 2, 3, 4]);
    assert_eq!(line.returned_ids(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_slow_line_does_not_reorder_fast_line() {
    let mut harness = TestHarness::new(InstrumentedAnalyzer::new());
    let slow = harness.add_line(
        MockLine::new("slow", fixtures::sheets(0, 5)).with_fetch_delay(Duration::from_millis(10)),
    );
    let fast = harness.add_line(MockLine::new("fast", fixtures::sheets(1000, 20)));

    harness.run(3);

    assert_eq!(slow.returned_ids(), (0..5).collect::<Vec<_>>());
    assert_eq!(fast.returned_ids(), (1000..1020).collect::<Vec<_>>());
}

#[test]
fn test_stop_waits_for_slow_sheet() {
    let delay = Duration::from_millis(100);
    let mut harness =
        TestHarness::new(InstrumentedAnalyzer::new().with_delay_for(2, delay));
    let line = harness.add_line(MockLine::new("barrier", fixtures::sheets(0, 4)));

    let started = Instant::now();
    harness.run(2);

    assert!(started.elapsed() >= delay);
    assert_eq!(line.returned_ids(), vec![0, 1, 2, 3]);

    let status = harness.control.status();
    assert_eq!(status.active_lines, 0);
    assert_eq!(status.pool.map(|p| p.active), Some(0));
}

#[test]
fn test_queue_lines_with_reference_analyzer() {
    let first = Arc::new(QueueLine::new("first", fixtures::sheets(0, 6)));
    let second = Arc::new(QueueLine::new("second", fixtures::sheets(100, 3)));

    let mut control = QualityControl::default();
    control.add_line(first.clone()).unwrap();
    control.add_line(second.clone()).unwrap();
    control.start(4).unwrap();
    control.stop().unwrap();

    assert!(first.is_complete());
    assert!(second.is_complete());

    let ids: Vec<_> = second.returned().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![100, 101, 102]);
    assert!(first.returned().iter().all(|s| s.is_analyzed()));
}
