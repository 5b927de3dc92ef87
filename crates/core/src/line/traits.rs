//! Trait definitions for the line module.

use crate::sheet::Sheet;

/// A source of sheets that also accepts them back once analyzed.
///
/// `fetch_sheet` and `done_sheet` are called from two different threads of
/// the owning pipeline, so implementations must be internally synchronized.
pub trait ProductionLine: Send + Sync {
    /// Returns a human readable name used in logs and metrics.
    fn name(&self) -> &str;

    /// Returns the next sheet, or `None` once the line is exhausted.
    ///
    /// The pipeline never calls this again after the first `None`.
    fn fetch_sheet(&self) -> Option<Sheet>;

    /// Accepts an analyzed sheet back, in fetch order.
    fn done_sheet(&self, sheet: Sheet);
}
