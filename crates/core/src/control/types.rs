//! Types for the control module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::{LineStatus, PipelineError};
use crate::pool::{PoolError, PoolStatus};

/// Error type for controller operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Lines can only be added, and the controller started, once.
    #[error("Quality control has already been started")]
    AlreadyStarted,

    /// `start` needs at least one worker thread.
    #[error("Worker thread count must be at least 1")]
    ZeroWorkers,

    /// The worker pool could not be created.
    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),

    /// A line pipeline failed to start or join.
    #[error("Line pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Snapshot of the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlStatus {
    /// Whether `start` has been called.
    pub started: bool,
    /// Lines that have not reached the finished state yet.
    pub active_lines: usize,
    /// Shared pool, once started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStatus>,
    /// Every registered line, in registration order.
    pub lines: Vec<LineStatus>,
}
