//! Trait definitions for the analysis module.

use std::sync::Arc;

use crate::sheet::Sheet;

/// Answers every query of a sheet.
///
/// Implementations must be total: a panic inside `analyze` running on a
/// worker thread aborts the process.
pub trait SheetAnalyzer: Send + Sync + 'static {
    /// Returns the name of this analyzer implementation.
    fn name(&self) -> &str;

    /// Writes the result slot of every query in `sheet`.
    fn analyze(&self, sheet: &mut Sheet);
}

impl<A: SheetAnalyzer + ?Sized> SheetAnalyzer for Arc<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn analyze(&self, sheet: &mut Sheet) {
        (**self).analyze(sheet)
    }
}

/// Runs the analysis for a single sheet on the calling thread.
///
/// This is exactly what a worker runs, without any pool or pipeline involved.
pub fn check_sheet<A: SheetAnalyzer + ?Sized>(analyzer: &A, sheet: &mut Sheet) {
    analyzer.analyze(sheet);
    debug_assert!(
        sheet.is_analyzed(),
        "analyzer {} left queries of sheet {} unanswered",
        analyzer.name(),
        sheet.id()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantAnalyzer;

    impl SheetAnalyzer for ConstantAnalyzer {
        fn name(&self) -> &str {
            "constant"
        }

        fn analyze(&self, sheet: &mut Sheet) {
            for query in &mut sheet.volume {
                query.record(42);
            }
        }
    }

    #[test]
    fn test_check_sheet_runs_analyzer_in_place() {
        let mut sheet = Sheet::new(1, 1, 1, vec![3]).unwrap().with_volume(5);
        check_sheet(&ConstantAnalyzer, &mut sheet);
        assert_eq!(sheet.volume[0].result(), Some(42));
    }

    #[test]
    fn test_arc_analyzer_delegates() {
        let analyzer: Arc<dyn SheetAnalyzer> = Arc::new(ConstantAnalyzer);
        assert_eq!(analyzer.name(), "constant");

        let mut sheet = Sheet::new(1, 1, 1, vec![3]).unwrap().with_volume(5);
        check_sheet(&analyzer, &mut sheet);
        assert!(sheet.is_analyzed());
    }
}
