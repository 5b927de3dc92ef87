//! Testing utilities and instrumented collaborators.
//!
//! This module provides doubles for the two collaborators the core consumes,
//! so ordering, capacity and completeness can be asserted without real
//! production lines.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetline_core::testing::{fixtures, InstrumentedAnalyzer, MockLine};
//!
//! let line = Arc::new(MockLine::new("line-a", fixtures::sheets(0, 5)));
//! let analyzer = InstrumentedAnalyzer::new().with_delay_for(0, Duration::from_millis(50));
//!
//! let mut control = QualityControl::new(analyzer);
//! control.add_line(line.clone())?;
//! control.start(4)?;
//! control.stop()?;
//!
//! assert_eq!(line.returned_ids(), vec![0, 1, 2, 3, 4]);
//! ```

mod mock_analyzer;
mod mock_line;

pub use mock_analyzer::InstrumentedAnalyzer;
pub use mock_line::MockLine;

/// Sheet builders with deterministic contents.
pub mod fixtures {
    use crate::sheet::{Sheet, ThicknessRange};

    /// A `width` x `length` sheet with a deterministic thickness pattern and
    /// one query of each kind.
    pub fn sheet_with_size(id: u64, width: usize, length: usize) -> Sheet {
        let thickness = (0..width * length)
            .map(|cell| 10 + ((cell as u64 * 7 + id * 3) % 11) as i32)
            .collect();
        let band = ThicknessRange::new(12, 18).expect("static band is ordered");

        Sheet::new(id, width, length, thickness)
            .expect("fixture dimensions match")
            .with_rel_dev(0.25)
            .with_volume(120)
            .with_min_max(band)
    }

    /// A small 4 x 3 sheet.
    pub fn sheet(id: u64) -> Sheet {
        sheet_with_size(id, 4, 3)
    }

    /// `count` sheets with consecutive ids starting at `first_id`.
    pub fn sheets(first_id: u64, count: usize) -> Vec<Sheet> {
        (0..count as u64).map(|i| sheet(first_id + i)).collect()
    }
}
