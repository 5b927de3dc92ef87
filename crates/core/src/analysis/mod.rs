//! Sheet analysis.
//!
//! The pipeline treats analysis as a black box behind [`SheetAnalyzer`]: a
//! synchronous, CPU-bound function that fills every query's result slot in
//! place. [`MaxRectAnalyzer`] is the reference implementation.

mod max_rect;
mod traits;

pub use max_rect::MaxRectAnalyzer;
pub use traits::{check_sheet, SheetAnalyzer};
