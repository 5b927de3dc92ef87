//! Shared worker pool.
//!
//! [`WorkerPool`] bounds how many analysis tasks run at once across every
//! production line. It is a pure capacity limiter: `submit` blocks the caller
//! while all slots are taken, then runs the task on its own thread and returns
//! immediately. Tasks may start and finish in any order.

mod types;
mod worker_pool;

pub use types::{PoolError, PoolStatus};
pub use worker_pool::WorkerPool;

pub(crate) use worker_pool::abort_on_panic;
