//! Line pipeline implementation.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use super::reorder::ReorderBuffer;
use super::types::{LineState, LineStatus, PipelineError};
use crate::analysis::SheetAnalyzer;
use crate::line::ProductionLine;
use crate::metrics;
use crate::pool::{abort_on_panic, WorkerPool};
use crate::sheet::Sheet;

type FinishedCallback = Box<dyn FnOnce() + Send>;

/// Per-line state shared by the fetch thread, the return thread and the
/// analysis tasks, always mutated under `progress`.
struct LineProgress {
    state: LineState,
    /// Sequence numbers handed out so far.
    dispatched: u64,
    /// Sheets whose `done_sheet` call has returned.
    returned: u64,
    buffer: ReorderBuffer<Sheet>,
}

impl LineProgress {
    fn is_drained(&self) -> bool {
        self.state == LineState::InputDrained && self.buffer.next_expected() == self.dispatched
    }
}

struct LineShared {
    id: usize,
    name: String,
    progress: Mutex<LineProgress>,
    /// Signalled when a sheet lands in the buffer or the input runs dry.
    changed: Condvar,
    on_finished: Mutex<Option<FinishedCallback>>,
}

impl LineShared {
    fn next_sequence(&self) -> u64 {
        let mut progress = self.progress.lock();
        let seq = progress.dispatched;
        progress.dispatched += 1;
        seq
    }

    fn complete(&self, seq: u64, sheet: Sheet) {
        let mut progress = self.progress.lock();
        if let Err(e) = progress.buffer.insert(seq, sheet) {
            error!(line = %self.name, error = %e, "Reorder buffer rejected sheet");
            debug_assert!(false, "reorder buffer rejected sequence {}", seq);
            return;
        }
        metrics::REORDER_BUFFER_DEPTH
            .with_label_values(&[self.name.as_str()])
            .set(progress.buffer.len() as i64);
        self.changed.notify_one();
    }

    fn mark_input_drained(&self) {
        let mut progress = self.progress.lock();
        if progress.state == LineState::Running {
            progress.state = LineState::InputDrained;
        }
        self.changed.notify_one();
    }

    /// Fires the finished callback; later calls are no-ops.
    fn finish(&self) {
        let callback = self.on_finished.lock().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// Drives one production line against the shared worker pool.
pub struct LinePipeline<A: SheetAnalyzer> {
    line: Arc<dyn ProductionLine>,
    analyzer: Arc<A>,
    shared: Arc<LineShared>,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl<A: SheetAnalyzer> LinePipeline<A> {
    /// Creates an idle pipeline for `line`.
    pub fn new(id: usize, line: Arc<dyn ProductionLine>, analyzer: Arc<A>) -> Self {
        let shared = Arc::new(LineShared {
            id,
            name: line.name().to_string(),
            progress: Mutex::new(LineProgress {
                state: LineState::Idle,
                dispatched: 0,
                returned: 0,
                buffer: ReorderBuffer::new(),
            }),
            changed: Condvar::new(),
            on_finished: Mutex::new(None),
        });

        Self {
            line,
            analyzer,
            shared,
            handles: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.shared.id
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Starts the fetch and return threads.
    ///
    /// `on_finished` runs exactly once, on the return thread, after the last
    /// sheet went back to the line. If the fetch thread cannot be spawned the
    /// line is treated as empty and still finishes.
    pub fn start<F>(&mut self, pool: WorkerPool, on_finished: F) -> Result<(), PipelineError>
    where
        F: FnOnce() + Send + 'static,
    {
        let line_id = self.shared.id;
        {
            let mut progress = self.shared.progress.lock();
            if progress.state != LineState::Idle {
                return Err(PipelineError::AlreadyStarted { line: line_id });
            }
            progress.state = LineState::Running;
        }
        *self.shared.on_finished.lock() = Some(Box::new(on_finished));

        let returner = {
            let line = Arc::clone(&self.line);
            let shared = Arc::clone(&self.shared);
            thread::Builder::new()
                .name(format!("sheetline-line{}-return", line_id))
                .spawn(move || return_loop(line, shared))
        };
        match returner {
            Ok(handle) => self.handles.push(("return", handle)),
            Err(source) => {
                self.shared.progress.lock().state = LineState::Finished;
                self.shared.finish();
                return Err(PipelineError::Spawn {
                    line: line_id,
                    activity: "return",
                    source,
                });
            }
        }

        let fetcher = {
            let line = Arc::clone(&self.line);
            let analyzer = Arc::clone(&self.analyzer);
            let shared = Arc::clone(&self.shared);
            thread::Builder::new()
                .name(format!("sheetline-line{}-fetch", line_id))
                .spawn(move || fetch_loop(line, analyzer, shared, pool))
        };
        match fetcher {
            Ok(handle) => self.handles.push(("fetch", handle)),
            Err(source) => {
                self.shared.mark_input_drained();
                return Err(PipelineError::Spawn {
                    line: line_id,
                    activity: "fetch",
                    source,
                });
            }
        }

        info!(line = %self.shared.name, line_id, "Line started");
        Ok(())
    }

    /// Waits for both activity threads to exit.
    pub fn join(&mut self) -> Result<(), PipelineError> {
        let mut result = Ok(());
        for (activity, handle) in self.handles.drain(..) {
            if handle.join().is_err() && result.is_ok() {
                result = Err(PipelineError::ActivityPanicked {
                    line: self.shared.id,
                    activity,
                });
            }
        }
        result
    }

    /// Returns a snapshot of the line.
    pub fn status(&self) -> LineStatus {
        let progress = self.shared.progress.lock();
        LineStatus {
            id: self.shared.id,
            name: self.shared.name.clone(),
            state: progress.state,
            fetched: progress.dispatched,
            returned: progress.returned,
            buffered: progress.buffer.len(),
            peak_buffered: progress.buffer.peak(),
        }
    }
}

impl<A: SheetAnalyzer> Drop for LinePipeline<A> {
    /// Blocks until a started line has drained, as `join` does.
    fn drop(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        debug!(line = %self.shared.name, "Joining line threads on drop");
        if let Err(e) = self.join() {
            warn!(line = %self.shared.name, error = %e, "Line thread failed during drop");
        }
    }
}

fn fetch_loop<A: SheetAnalyzer>(
    line: Arc<dyn ProductionLine>,
    analyzer: Arc<A>,
    shared: Arc<LineShared>,
    pool: WorkerPool,
) {
    let context = format!("{} fetch", shared.name);
    abort_on_panic(&context, || {
        while let Some(mut sheet) = line.fetch_sheet() {
            let seq = shared.next_sequence();
            debug!(line = %shared.name, seq, sheet_id = sheet.id(), "Dispatching sheet");
            metrics::SHEETS_DISPATCHED
                .with_label_values(&[shared.name.as_str()])
                .inc();

            let analyzer = Arc::clone(&analyzer);
            let task_shared = Arc::clone(&shared);
            let submitted = pool.submit(move || {
                let started = Instant::now();
                analyzer.analyze(&mut sheet);
                metrics::ANALYSIS_DURATION.observe(started.elapsed().as_secs_f64());
                task_shared.complete(seq, sheet);
            });

            if let Err(e) = submitted {
                error!(line = %shared.name, seq, error = %e, "Cannot dispatch sheet, aborting");
                std::process::abort();
            }
        }

        debug!(line = %shared.name, "Input drained");
        shared.mark_input_drained();
    });
}

fn return_loop(line: Arc<dyn ProductionLine>, shared: Arc<LineShared>) {
    let context = format!("{} return", shared.name);
    abort_on_panic(&context, || {
        let mut progress = shared.progress.lock();
        loop {
            if let Some((seq, sheet)) = progress.buffer.pop_next() {
                metrics::REORDER_BUFFER_DEPTH
                    .with_label_values(&[shared.name.as_str()])
                    .set(progress.buffer.len() as i64);
                MutexGuard::unlocked(&mut progress, || {
                    debug!(line = %shared.name, seq, sheet_id = sheet.id(), "Returning sheet");
                    line.done_sheet(sheet);
                });
                progress.returned += 1;
                metrics::SHEETS_RETURNED
                    .with_label_values(&[shared.name.as_str()])
                    .inc();
                continue;
            }

            if progress.is_drained() {
                progress.state = LineState::Finished;
                break;
            }

            shared.changed.wait(&mut progress);
        }

        let returned = progress.returned;
        drop(progress);
        info!(line = %shared.name, returned, "Line finished");
        shared.finish();
    });
}
