//! Sheet data model.
//!
//! A [`Sheet`] is one work item produced by a production line: a row-major
//! thickness grid plus the queries the analysis has to answer for it. Each
//! query owns a result slot that the analysis fills exactly once.

mod error;
mod grid;
mod types;

pub use error::SheetError;
pub use grid::ThicknessGrid;
pub use types::{Query, Sheet, ThicknessRange};
