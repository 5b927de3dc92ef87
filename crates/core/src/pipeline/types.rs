//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// `start` was called on a pipeline that already ran.
    #[error("Line {line} has already been started")]
    AlreadyStarted { line: usize },

    /// An activity thread could not be created.
    #[error("Failed to spawn {activity} thread for line {line}: {source}")]
    Spawn {
        line: usize,
        activity: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// An activity thread terminated by panicking.
    #[error("The {activity} thread of line {line} panicked")]
    ActivityPanicked { line: usize, activity: &'static str },
}

/// Lifecycle of a line pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineState {
    /// Created, not started.
    Idle,
    /// Fetching and returning.
    Running,
    /// Source exhausted, still returning.
    InputDrained,
    /// Every sheet returned, finished callback fired.
    Finished,
}

/// Snapshot of a line pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineStatus {
    /// Registration index.
    pub id: usize,
    /// Line name as reported by the source.
    pub name: String,
    /// Current lifecycle state.
    pub state: LineState,
    /// Sheets fetched (and dispatched) so far.
    pub fetched: u64,
    /// Sheets handed back so far.
    pub returned: u64,
    /// Analyzed sheets waiting for a predecessor.
    pub buffered: usize,
    /// Largest reorder backlog observed.
    pub peak_buffered: usize,
}
