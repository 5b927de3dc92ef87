//! Quality controller implementation.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use tracing::{info, warn};

use super::types::{ControlError, ControlStatus};
use crate::analysis::{self, MaxRectAnalyzer, SheetAnalyzer};
use crate::line::ProductionLine;
use crate::metrics;
use crate::pipeline::LinePipeline;
use crate::pool::WorkerPool;
use crate::sheet::Sheet;

/// Count of lines that have not finished yet.
#[derive(Debug, Default)]
struct ActiveLines {
    count: Mutex<usize>,
    all_finished: Condvar,
}

impl ActiveLines {
    fn reset(&self, lines: usize) {
        *self.count.lock() = lines;
    }

    fn line_finished(&self) {
        let mut count = self.count.lock();
        debug_assert!(*count > 0, "more lines finished than were started");
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.all_finished.notify_all();
        }
    }

    fn wait_all(&self) {
        let mut count = self.count.lock();
        while *count != 0 {
            self.all_finished.wait(&mut count);
        }
    }

    fn get(&self) -> usize {
        *self.count.lock()
    }
}

/// Registry of production lines and the join barrier over them.
pub struct QualityControl<A: SheetAnalyzer = MaxRectAnalyzer> {
    analyzer: Arc<A>,
    lines: Vec<LinePipeline<A>>,
    pool: Option<WorkerPool>,
    active: Arc<ActiveLines>,
}

impl Default for QualityControl<MaxRectAnalyzer> {
    fn default() -> Self {
        Self::new(MaxRectAnalyzer::new())
    }
}

impl<A: SheetAnalyzer> QualityControl<A> {
    /// Creates a controller that analyzes sheets with `analyzer`.
    pub fn new(analyzer: A) -> Self {
        Self::with_shared_analyzer(Arc::new(analyzer))
    }

    /// Creates a controller around an analyzer the caller keeps a handle to.
    pub fn with_shared_analyzer(analyzer: Arc<A>) -> Self {
        Self {
            analyzer,
            lines: Vec::new(),
            pool: None,
            active: Arc::new(ActiveLines::default()),
        }
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Number of registered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_started(&self) -> bool {
        self.pool.is_some()
    }

    /// Registers a line; returns its zero-based id.
    ///
    /// Lines can only be added before [`start`](Self::start).
    pub fn add_line(&mut self, line: Arc<dyn ProductionLine>) -> Result<usize, ControlError> {
        if self.is_started() {
            warn!(line = %line.name(), "Rejecting line added after start");
            return Err(ControlError::AlreadyStarted);
        }

        let id = self.lines.len();
        self.lines
            .push(LinePipeline::new(id, line, Arc::clone(&self.analyzer)));
        Ok(id)
    }

    /// Starts every registered line against one pool of `worker_threads`.
    pub fn start(&mut self, worker_threads: usize) -> Result<(), ControlError> {
        if self.is_started() {
            return Err(ControlError::AlreadyStarted);
        }
        if worker_threads == 0 {
            return Err(ControlError::ZeroWorkers);
        }

        let pool = WorkerPool::new(worker_threads)?;
        self.pool = Some(pool.clone());
        self.active.reset(self.lines.len());

        info!(
            lines = self.lines.len(),
            worker_threads,
            analyzer = self.analyzer.name(),
            "Starting quality control"
        );

        for index in 0..self.lines.len() {
            let active = Arc::clone(&self.active);
            let started = self.lines[index].start(pool.clone(), move || {
                metrics::LINES_FINISHED.inc();
                active.line_finished();
            });

            if let Err(e) = started {
                // Lines after the failed one never run, so they will never
                // report in.
                for _ in index + 1..self.lines.len() {
                    self.active.line_finished();
                }
                return Err(e.into());
            }
        }

        Ok(())
    }

    /// Blocks until every line has returned all of its sheets.
    ///
    /// Activities stop on their own; this only waits for them, joins their
    /// threads and waits for the pool to go idle. Calling it before `start`
    /// returns immediately.
    pub fn stop(&mut self) -> Result<(), ControlError> {
        let Some(pool) = self.pool.clone() else {
            warn!("stop() called before start(), nothing to wait for");
            return Ok(());
        };

        self.active.wait_all();
        for line in &mut self.lines {
            line.join()?;
        }
        pool.wait_idle();

        let status = pool.status();
        info!(
            lines = self.lines.len(),
            sheets = status.total_completed,
            peak_workers = status.peak_active,
            "Quality control stopped"
        );
        Ok(())
    }

    /// Analyzes one sheet on the calling thread, without any pool.
    pub fn check_sheet(&self, sheet: &mut Sheet) {
        analysis::check_sheet(&*self.analyzer, sheet);
    }

    /// Returns a snapshot of the controller, the pool and every line.
    pub fn status(&self) -> ControlStatus {
        ControlStatus {
            started: self.is_started(),
            active_lines: self.active.get(),
            pool: self.pool.as_ref().map(WorkerPool::status),
            lines: self.lines.iter().map(LinePipeline::status).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::QueueLine;
    use crate::pipeline::LineState;
    use crate::testing::{fixtures, MockLine};

    #[test]
    fn test_stop_without_lines_returns_immediately() {
        let mut control = QualityControl::default();
        control.start(2).unwrap();
        control.stop().unwrap();

        let status = control.status();
        assert!(status.started);
        assert_eq!(status.active_lines, 0);
        assert!(status.lines.is_empty());
    }

    #[test]
    fn test_stop_before_start_is_a_no_op() {
        let mut control = QualityControl::default();
        control
            .add_line(Arc::new(MockLine::new("idle", fixtures::sheets(0, 2))))
            .unwrap();
        control.stop().unwrap();

        let status = control.status();
        assert!(!status.started);
        assert_eq!(status.lines[0].state, LineState::Idle);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut control = QualityControl::default();
        assert!(matches!(control.start(0), Err(ControlError::ZeroWorkers)));
        assert!(!control.is_started());
    }

    #[test]
    fn test_add_line_after_start_rejected() {
        let mut control = QualityControl::default();
        assert_eq!(
            control
                .add_line(Arc::new(QueueLine::new("a", Vec::new())))
                .unwrap(),
            0
        );
        control.start(1).unwrap();

        let late = control.add_line(Arc::new(QueueLine::new("late", Vec::new())));
        assert!(matches!(late, Err(ControlError::AlreadyStarted)));
        control.stop().unwrap();
        assert_eq!(control.line_count(), 1);
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut control = QualityControl::default();
        control.start(1).unwrap();
        assert!(matches!(control.start(1), Err(ControlError::AlreadyStarted)));
        control.stop().unwrap();
    }

    #[test]
    fn test_check_sheet_matches_pipeline_result() {
        let line = Arc::new(QueueLine::new("check", fixtures::sheets(0, 3)));
        let mut control = QualityControl::default();
        control.add_line(line.clone()).unwrap();
        control.start(2).unwrap();
        control.stop().unwrap();

        for (expected_input, returned) in fixtures::sheets(0, 3).into_iter().zip(line.returned()) {
            let mut expected = expected_input;
            control.check_sheet(&mut expected);
            assert_eq!(expected, returned);
        }
    }

    #[test]
    fn test_drop_without_stop_waits_for_lines() {
        let line = Arc::new(QueueLine::new("dropped", fixtures::sheets(0, 6)));
        let mut control = QualityControl::default();
        control.add_line(line.clone()).unwrap();
        control.start(2).unwrap();
        drop(control);

        assert!(line.is_complete());
        assert_eq!(line.returned_count(), 6);
    }

    #[test]
    fn test_status_after_run() {
        let line = Arc::new(QueueLine::new("status", fixtures::sheets(0, 4)));
        let mut control = QualityControl::default();
        control.add_line(line).unwrap();
        control.start(3).unwrap();
        control.stop().unwrap();

        let status = control.status();
        let pool = status.pool.unwrap();
        assert_eq!(pool.capacity, 3);
        assert_eq!(pool.active, 0);
        assert_eq!(pool.total_completed, 4);
        assert_eq!(status.lines[0].state, LineState::Finished);
        assert_eq!(status.lines[0].returned, 4);
    }
}
