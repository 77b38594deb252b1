//! Measure command - single-image measurement.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use eyefit_adapters::fs::load_frame;
use tracing::info;

use super::{ExitCode, MeasureOptions};
use crate::backend::{self, Mode};
use crate::config::AppConfig;
use crate::output::JsonOutput;

/// Arguments for measuring one image.
#[derive(Args, Clone, Debug)]
pub struct MeasureArgs {
    /// Image file to measure
    pub image: PathBuf,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub measure: MeasureOptions,
}

/// Run the measure command.
///
/// Prints the measurement as JSON on stdout. A detection failure is printed
/// on stderr and yields [`ExitCode::Incomplete`].
pub fn run(args: MeasureArgs, config: &AppConfig) -> Result<ExitCode> {
    let options = args.measure.with_config(config);

    let frame = load_frame(&args.image)?;
    info!(
        "Measuring {} ({}x{})",
        args.image.display(),
        frame.width(),
        frame.height()
    );

    let mut measurer = backend::measurer(
        Mode::SingleShot,
        &options.cascades(config),
        options.measure_config(),
    )?;

    match measurer.measure(&frame) {
        Ok(measurement) => {
            JsonOutput::stdout(args.pretty).write_measurement(&measurement)?;
            Ok(ExitCode::Success)
        }
        Err(e) if e.is_detection_failure() => {
            eprintln!("{e}");
            Ok(ExitCode::Incomplete)
        }
        Err(e) => Err(e.into()),
    }
}
