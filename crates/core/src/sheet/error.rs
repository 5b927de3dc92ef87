//! Error types for sheet construction.

use thiserror::Error;

/// Errors that can occur while building a sheet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    /// Width or length is zero.
    #[error("Sheet {id} has an empty grid ({width}x{length})")]
    EmptyGrid {
        id: u64,
        width: usize,
        length: usize,
    },

    /// `width * length` does not fit in `usize`.
    #[error("Sheet {id} grid {width}x{length} is too large")]
    GridTooLarge {
        id: u64,
        width: usize,
        length: usize,
    },

    /// Thickness data does not match the declared dimensions.
    #[error("Sheet {id} declares {expected} cells but carries {actual} thickness values")]
    DimensionMismatch {
        id: u64,
        expected: usize,
        actual: usize,
    },

    /// A min/max band with `lo > hi`.
    #[error("Invalid thickness range: lo {lo} is above hi {hi}")]
    InvalidRange { lo: i32, hi: i32 },
}
