//! Scan command - batch-averaged measurement from the webcam.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use eyefit_adapters::{CsvSummaryOutput, FsFrameSource};
use eyefit_core::{run_scan, FrameSource, ScanConfig, ScanOutcome, ScanSummary, SummaryOutput};
use tracing::info;

use super::{parse_count, ExitCode, MeasureOptions};
use crate::backend::{self, CameraOptions, Mode};
use crate::config::AppConfig;
use crate::output::{JsonOutput, ScanProgress};

/// Hardcoded defaults for values not set by CLI or config.
mod defaults {
    pub const CAMERA_INDEX: i32 = 0;
    pub const COUNTDOWN_SECS: u32 = 3;
}

/// Arguments for a batch scan.
#[derive(Args, Clone, Debug, Default)]
pub struct ScanArgs {
    /// Camera device index
    #[arg(long, value_name = "INDEX")]
    pub camera: Option<i32>,

    /// Replay image files or directories (sorted by name) instead of the camera
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub frames: Vec<PathBuf>,

    /// CSV file for the final measurements
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of measurement runs to average
    #[arg(long, value_parser = parse_count)]
    pub batches: Option<usize>,

    /// Measurements collected per run
    #[arg(long, value_parser = parse_count)]
    pub frames_per_batch: Option<usize>,

    /// Consecutive face-less frames before a run is restarted
    #[arg(long, value_parser = parse_count)]
    pub lost_frames: Option<usize>,

    /// Seconds to count down before measuring
    #[arg(long, value_name = "SECS")]
    pub countdown: Option<u32>,

    /// Do not flip frames horizontally
    #[arg(long)]
    pub no_mirror: bool,

    /// Show the camera preview with an alignment oval (press q to quit)
    #[arg(long)]
    pub preview: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub measure: MeasureOptions,
}

impl ScanArgs {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        let scan = &config.scan;
        args.camera = args.camera.or(scan.camera_index);
        args.batches = args.batches.or(scan.batches);
        args.frames_per_batch = args.frames_per_batch.or(scan.frames_per_batch);
        args.lost_frames = args.lost_frames.or(scan.lost_frame_threshold);
        args.countdown = args.countdown.or(scan.countdown_secs);
        if args.output.is_none() {
            args.output.clone_from(&scan.output);
        }
        if !args.no_mirror {
            args.no_mirror = !scan.mirror.unwrap_or(true);
        }
        if !args.preview {
            args.preview = scan.preview.unwrap_or(false);
        }
        args.measure = args.measure.with_config(config);
        args
    }

    /// Batch scan parameters with hardcoded fallbacks.
    fn scan_config(&self) -> ScanConfig {
        let defaults = ScanConfig::default();
        ScanConfig {
            frames_per_batch: self.frames_per_batch.unwrap_or(defaults.frames_per_batch),
            batches: self.batches.unwrap_or(defaults.batches),
            lost_frame_threshold: self.lost_frames.unwrap_or(defaults.lost_frame_threshold),
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(CsvSummaryOutput::DEFAULT_FILE))
    }

    fn camera_options(&self) -> CameraOptions {
        CameraOptions {
            index: self.camera.unwrap_or(defaults::CAMERA_INDEX),
            mirror: !self.no_mirror,
            preview: self.preview,
            countdown_secs: self.countdown.unwrap_or(defaults::COUNTDOWN_SECS),
        }
    }
}

/// Run the scan command.
pub fn run(args: ScanArgs, config: &AppConfig) -> Result<ExitCode> {
    let args = ScanArgs::with_config(args, config);
    let scan_config = args.scan_config();
    info!(
        "Scanning {} runs of {} frames",
        scan_config.batches, scan_config.frames_per_batch
    );

    let mut measurer = backend::measurer(
        Mode::Scan,
        &args.measure.cascades(config),
        args.measure.measure_config(),
    )?;

    let mut source: Box<dyn FrameSource> = if args.frames.is_empty() {
        backend::camera(args.camera_options())?
    } else {
        Box::new(FsFrameSource::new(&args.frames).mirrored(!args.no_mirror))
    };

    let show_bar = !args.quiet && std::io::stderr().is_terminal();
    let progress = ScanProgress::new(args.quiet, show_bar);

    let outcome = run_scan(source.as_mut(), measurer.as_mut(), &scan_config, &progress)?;
    drop(source);

    match outcome {
        ScanOutcome::Completed(summary) => {
            let path = args.output_path();
            CsvSummaryOutput::new(&path).write(&summary)?;
            if args.json {
                JsonOutput::stdout(false).write(&summary)?;
            } else {
                print_summary(&summary);
                println!("Saved to {}", path.display());
            }
            Ok(ExitCode::Success)
        }
        ScanOutcome::Incomplete { completed_batches } => {
            info!("Scan stopped after {completed_batches} complete runs");
            eprintln!("Measurement did not complete successfully. Please retry.");
            Ok(ExitCode::Incomplete)
        }
    }
}

fn print_summary(summary: &ScanSummary) {
    let m = &summary.measurement;
    println!(
        "Final averaged measurements ({} runs, {} frames):",
        summary.batches, summary.frames
    );
    println!("  Eye Width: {} mm", m.eye_width_mm);
    println!("  Bridge Size: {} mm", m.bridge_width_mm);
    println!("  B Size (Vertical Height): {} mm", m.b_size_mm);
}
