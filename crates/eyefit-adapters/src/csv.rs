//! CSV summary output adapter.

use std::path::PathBuf;

use anyhow::{Context, Result};
use eyefit_core::{ScanSummary, SummaryOutput};
use tracing::info;

/// Writes the final scan summary as a two-column CSV file.
pub struct CsvSummaryOutput {
    path: PathBuf,
}

impl CsvSummaryOutput {
    /// Default output file name.
    pub const DEFAULT_FILE: &'static str = "glasses_final_dimensions.csv";

    /// Creates an output writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SummaryOutput for CsvSummaryOutput {
    fn write(&self, summary: &ScanSummary) -> Result<()> {
        let mut writer = ::csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;

        let m = &summary.measurement;
        writer.write_record(["Measurement", "Value (mm)"])?;
        writer.write_record(["Eye Width", &m.eye_width_mm.to_string()])?;
        writer.write_record(["Bridge Size", &m.bridge_width_mm.to_string()])?;
        writer.write_record(["B Size (Vertical Height)", &m.b_size_mm.to_string()])?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        info!("Final measurements saved to {}", self.path.display());
        Ok(())
    }
}
