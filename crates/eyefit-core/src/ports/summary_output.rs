//! Summary output port for writing batch scan results.

use crate::domain::ScanSummary;

/// Port for persisting the final scan summary.
pub trait SummaryOutput {
    /// Writes the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, summary: &ScanSummary) -> anyhow::Result<()>;
}
