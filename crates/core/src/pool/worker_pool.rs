//! Worker pool implementation.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error};

use super::types::{PoolError, PoolStatus};
use crate::metrics;

/// Runs `f`, aborting the process if it panics.
///
/// Analysis tasks and line activities are assumed total; a panic in either
/// would leave a line waiting forever for a sheet that never comes back.
pub(crate) fn abort_on_panic<F: FnOnce()>(context: &str, f: F) {
    if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
        error!(context, "Thread panicked, aborting");
        std::process::abort();
    }
}

/// Slot accounting, guarded by a single lock.
#[derive(Debug)]
struct Slots {
    free: usize,
    peak_active: usize,
    total_dispatched: u64,
    total_completed: u64,
}

#[derive(Debug)]
struct PoolShared {
    capacity: usize,
    slots: Mutex<Slots>,
    /// Signalled once per released slot.
    slot_freed: Condvar,
    /// Signalled when every slot is free again.
    idle: Condvar,
    next_worker: AtomicU64,
}

impl PoolShared {
    fn acquire_slot(&self) {
        let mut slots = self.slots.lock();
        while slots.free == 0 {
            self.slot_freed.wait(&mut slots);
        }
        slots.free -= 1;
        slots.total_dispatched += 1;
        let active = self.capacity - slots.free;
        slots.peak_active = slots.peak_active.max(active);
        metrics::WORKER_POOL_ACTIVE.inc();
    }

    fn release_slot(&self, completed: bool) {
        let mut slots = self.slots.lock();
        debug_assert!(slots.free < self.capacity, "released more slots than acquired");
        slots.free += 1;
        if completed {
            slots.total_completed += 1;
        } else {
            slots.total_dispatched -= 1;
        }
        metrics::WORKER_POOL_ACTIVE.dec();

        self.slot_freed.notify_one();
        if slots.free == self.capacity {
            self.idle.notify_all();
        }
    }
}

/// A fixed-capacity pool of execution slots shared by every line.
///
/// Cloning yields another handle to the same pool.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    shared: Arc<PoolShared>,
}

impl WorkerPool {
    /// Creates a pool allowing `capacity` concurrent tasks.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }

        Ok(Self {
            shared: Arc::new(PoolShared {
                capacity,
                slots: Mutex::new(Slots {
                    free: capacity,
                    peak_active: 0,
                    total_dispatched: 0,
                    total_completed: 0,
                }),
                slot_freed: Condvar::new(),
                idle: Condvar::new(),
                next_worker: AtomicU64::new(0),
            }),
        })
    }

    /// Maximum concurrent tasks.
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Runs `task` on a worker thread once a slot is free.
    ///
    /// Blocks the caller while the pool is saturated and returns as soon as
    /// the task has been dispatched, not when it completes. A task that
    /// panics aborts the process.
    pub fn submit<F>(&self, task: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.acquire_slot();

        let worker_id = self.shared.next_worker.fetch_add(1, Ordering::Relaxed);
        let thread_name = format!("sheetline-worker-{}", worker_id);
        let shared = Arc::clone(&self.shared);

        let spawned = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                abort_on_panic(&thread_name, task);
                shared.release_slot(true);
            });

        match spawned {
            Ok(_) => {
                debug!(worker_id, "Task dispatched");
                Ok(())
            }
            Err(source) => {
                self.shared.release_slot(false);
                Err(PoolError::Spawn { source })
            }
        }
    }

    /// Blocks until no task holds a slot.
    pub fn wait_idle(&self) {
        let mut slots = self.shared.slots.lock();
        while slots.free != self.shared.capacity {
            self.shared.idle.wait(&mut slots);
        }
    }

    /// Returns a snapshot of the pool counters.
    pub fn status(&self) -> PoolStatus {
        let slots = self.shared.slots.lock();
        PoolStatus {
            capacity: self.shared.capacity,
            active: self.shared.capacity - slots.free,
            peak_active: slots.peak_active,
            total_dispatched: slots.total_dispatched,
            total_completed: slots.total_completed,
        }
    }
}
