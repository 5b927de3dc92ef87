//! Per-line pipeline.
//!
//! A [`LinePipeline`] drives one production line with two threads:
//!
//! - fetch: pulls sheets from the line, numbers them from 0 and submits each
//!   to the shared [`WorkerPool`](crate::pool::WorkerPool);
//! - return: waits for the next expected sequence number to show up in the
//!   [`ReorderBuffer`] and hands sheets back to the line strictly in fetch
//!   order.
//!
//! Once the line is exhausted and every dispatched sheet has been returned,
//! the pipeline fires its finished callback exactly once.

mod line_pipeline;
mod reorder;
mod types;

pub use line_pipeline::LinePipeline;
pub use reorder::{ReorderBuffer, ReorderError};
pub use types::{LineState, LineStatus, PipelineError};
