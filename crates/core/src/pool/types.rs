//! Types for the pool module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for worker pool operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// A pool needs at least one slot.
    #[error("Worker pool capacity must be at least 1")]
    ZeroCapacity,

    /// The worker thread could not be created.
    #[error("Failed to spawn worker thread: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot of a worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Maximum concurrent tasks.
    pub capacity: usize,
    /// Tasks currently holding a slot.
    pub active: usize,
    /// Highest number of simultaneously held slots observed.
    pub peak_active: usize,
    /// Tasks dispatched since creation.
    pub total_dispatched: u64,
    /// Tasks that finished and released their slot.
    pub total_completed: u64,
}
