//! CLI command definitions and handlers.

pub mod cascades;
pub mod measure;
mod options;
pub mod push;
pub mod scan;
pub mod serve;

use clap::{Parser, Subcommand};

pub use options::MeasureOptions;

/// Eyefit - eyeglass-fitting measurements from a webcam or photo
#[derive(Parser)]
#[command(name = "eyefit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scan arguments used when no subcommand is given.
    #[command(flatten)]
    pub scan: scan::ScanArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Measure from the webcam, averaging several batches (default)
    Scan(scan::ScanArgs),
    /// Measure a single image file and print the result as JSON
    Measure(measure::MeasureArgs),
    /// Serve the measurement HTTP endpoint
    Serve(serve::ServeArgs),
    /// Push lens parameters into the CAD document
    Push(push::PushArgs),
    /// Manage Haar cascade files
    Cascades(cascades::CascadesArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// A measurement was produced (or the command succeeded).
    Success = 0,
    /// No measurement could be produced from the input.
    Incomplete = 1,
    /// The command failed.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Parse and validate a fraction (0.0-1.0).
pub fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Parse and validate a count of at least one.
pub fn parse_count(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid count"))?;
    if value >= 1 {
        Ok(value)
    } else {
        Err("must be at least 1".to_string())
    }
}

/// Parse and validate a strictly positive distance in millimeters.
pub fn parse_positive_mm(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{value} must be a positive distance"))
    }
}
