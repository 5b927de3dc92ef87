//! Largest-rectangle analyzer.
//!
//! Every query asks for the area of the largest axis-aligned sub-rectangle of
//! the thickness grid that satisfies a predicate:
//!
//! - min/max band: every cell lies inside the band;
//! - volume: the cell sum does not exceed the volume;
//! - relative deviation: the largest distance of the rectangle's minimum or
//!   maximum from its mean, divided by the mean, does not exceed the
//!   threshold. A rectangle with non-positive mean qualifies only when all of
//!   its cells are equal.
//!
//! All rectangles are enumerated once per sheet and every query is evaluated
//! against the same aggregates, so the cost is O(L² · W² · Q).

use tracing::trace;

use super::traits::SheetAnalyzer;
use crate::sheet::{Sheet, ThicknessGrid};

/// Aggregates of one candidate rectangle.
#[derive(Debug, Clone, Copy)]
struct RectStats {
    area: usize,
    min: i32,
    max: i32,
    sum: i64,
}

impl RectStats {
    fn within_rel_dev(&self, threshold: f64) -> bool {
        let mean = self.sum as f64 / self.area as f64;
        if mean <= 0.0 {
            return self.min == self.max;
        }
        let deviation = (self.max as f64 - mean).max(mean - self.min as f64);
        deviation / mean <= threshold
    }
}

/// Reference analyzer answering all query kinds by exhaustive search.
#[derive(Debug, Clone, Default)]
pub struct MaxRectAnalyzer;

impl MaxRectAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Visits the aggregates of every sub-rectangle of `grid`.
    fn for_each_rect(grid: &ThicknessGrid<'_>, mut visit: impl FnMut(&RectStats)) {
        let width = grid.width();
        let mut col_min = vec![i32::MAX; width];
        let mut col_max = vec![i32::MIN; width];
        let mut col_sum = vec![0_i64; width];

        for top in 0..grid.length() {
            col_min.fill(i32::MAX);
            col_max.fill(i32::MIN);
            col_sum.fill(0);

            for bottom in top..grid.length() {
                let rows = bottom - top + 1;
                for (col, &value) in grid.row(bottom).iter().enumerate() {
                    col_min[col] = col_min[col].min(value);
                    col_max[col] = col_max[col].max(value);
                    col_sum[col] += i64::from(value);
                }

                for left in 0..width {
                    let mut stats = RectStats {
                        area: 0,
                        min: i32::MAX,
                        max: i32::MIN,
                        sum: 0,
                    };
                    for right in left..width {
                        stats.area = rows * (right - left + 1);
                        stats.min = stats.min.min(col_min[right]);
                        stats.max = stats.max.max(col_max[right]);
                        stats.sum += col_sum[right];
                        visit(&stats);
                    }
                }
            }
        }
    }
}

impl SheetAnalyzer for MaxRectAnalyzer {
    fn name(&self) -> &str {
        "max-rect"
    }

    fn analyze(&self, sheet: &mut Sheet) {
        let mut best_rel_dev = vec![0_usize; sheet.rel_dev.len()];
        let mut best_volume = vec![0_usize; sheet.volume.len()];
        let mut best_min_max = vec![0_usize; sheet.min_max.len()];

        if sheet.query_count() > 0 {
            let grid = ThicknessGrid::from_sheet(sheet);
            Self::for_each_rect(&grid, |stats| {
                for (best, query) in best_rel_dev.iter_mut().zip(&sheet.rel_dev) {
                    if stats.area > *best && stats.within_rel_dev(query.param) {
                        *best = stats.area;
                    }
                }
                for (best, query) in best_volume.iter_mut().zip(&sheet.volume) {
                    if stats.area > *best && stats.sum <= query.param {
                        *best = stats.area;
                    }
                }
                for (best, query) in best_min_max.iter_mut().zip(&sheet.min_max) {
                    if stats.area > *best
                        && query.param.contains(stats.min)
                        && query.param.contains(stats.max)
                    {
                        *best = stats.area;
                    }
                }
            });
        }

        for (query, area) in sheet.rel_dev.iter_mut().zip(best_rel_dev) {
            query.record(area);
        }
        for (query, area) in sheet.volume.iter_mut().zip(best_volume) {
            query.record(area);
        }
        for (query, area) in sheet.min_max.iter_mut().zip(best_min_max) {
            query.record(area);
        }

        trace!(sheet_id = sheet.id(), queries = sheet.query_count(), "Sheet analyzed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::ThicknessRange;

    /// 3 wide, 2 long:
    /// 1 2 3
    /// 4 5 6
    fn ramp_sheet() -> Sheet {
        Sheet::new(1, 3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    fn range(lo: i32, hi: i32) -> ThicknessRange {
        ThicknessRange::new(lo, hi).unwrap()
    }

    #[test]
    fn test_min_max_band() {
        let mut sheet = ramp_sheet()
            .with_min_max(range(1, 3))
            .with_min_max(range(7, 9))
            .with_min_max(range(1, 6))
            .with_min_max(range(2, 5));
        MaxRectAnalyzer::new().analyze(&mut sheet);

        let areas: Vec<_> = sheet.min_max.iter().map(|q| q.result()).collect();
        assert_eq!(areas, vec![Some(3), Some(0), Some(6), Some(2)]);
    }

    #[test]
    fn test_volume() {
        let mut sheet = ramp_sheet()
            .with_volume(6)
            .with_volume(0)
            .with_volume(21)
            .with_volume(1);
        MaxRectAnalyzer::new().analyze(&mut sheet);

        let areas: Vec<_> = sheet.volume.iter().map(|q| q.result()).collect();
        assert_eq!(areas, vec![Some(3), Some(0), Some(6), Some(1)]);
    }

    #[test]
    fn test_rel_dev() {
        let mut sheet = ramp_sheet()
            .with_rel_dev(0.0)
            .with_rel_dev(0.5)
            .with_rel_dev(10.0);
        MaxRectAnalyzer::new().analyze(&mut sheet);

        let areas: Vec<_> = sheet.rel_dev.iter().map(|q| q.result()).collect();
        assert_eq!(areas, vec![Some(1), Some(4), Some(6)]);
    }

    #[test]
    fn test_rel_dev_uniform_and_zero_mean() {
        let mut uniform = Sheet::new(2, 2, 2, vec![5, 5, 5, 5])
            .unwrap()
            .with_rel_dev(0.0);
        MaxRectAnalyzer::new().analyze(&mut uniform);
        assert_eq!(uniform.rel_dev[0].result(), Some(4));

        let mut flat_zero = Sheet::new(3, 3, 1, vec![0, 0, -1])
            .unwrap()
            .with_rel_dev(100.0);
        MaxRectAnalyzer::new().analyze(&mut flat_zero);
        assert_eq!(flat_zero.rel_dev[0].result(), Some(2));
    }

    #[test]
    fn test_every_query_answered_once() {
        let mut sheet = ramp_sheet()
            .with_rel_dev(0.2)
            .with_volume(10)
            .with_min_max(range(4, 6));
        MaxRectAnalyzer::new().analyze(&mut sheet);
        assert!(sheet.is_analyzed());
        assert_eq!(sheet.min_max[0].result(), Some(3));
    }

    #[test]
    fn test_sheet_without_queries() {
        let mut sheet = ramp_sheet();
        MaxRectAnalyzer::new().analyze(&mut sheet);
        assert!(sheet.is_analyzed());
    }
}
