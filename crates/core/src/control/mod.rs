//! Quality controller.
//!
//! [`QualityControl`] owns the registered production lines, starts one
//! [`LinePipeline`](crate::pipeline::LinePipeline) per line against a single
//! shared [`WorkerPool`](crate::pool::WorkerPool) and offers a blocking
//! [`stop`](QualityControl::stop) that returns once every line has handed
//! back all of its sheets.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sheetline_core::{QualityControl, QueueLine};
//!
//! let line = Arc::new(QueueLine::new("line-a", sheets));
//!
//! let mut control = QualityControl::default();
//! control.add_line(line.clone())?;
//! control.start(4)?;
//! control.stop()?;
//!
//! assert!(line.is_complete());
//! ```

mod controller;
mod types;

pub use controller::QualityControl;
pub use types::{ControlError, ControlStatus};
