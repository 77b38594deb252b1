//! Eyefit CLI - Eyeglass-fitting measurements from a webcam or photo.
//!
//! # Detection backend
//!
//! `scan`, `measure` and `serve` need the OpenCV backend, which requires a
//! system OpenCV 4 (headers and `libclang` at build time):
//!
//! ```text
//! cargo build --release --features opencv
//! ```
//!
//! The default build has no backend. There those commands exit with code 2
//! and a message naming the feature; `push` and `cascades` work in every build.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod backend;
mod commands;
mod config;
mod output;
mod server;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let result = match cli.command {
        Some(Commands::Scan(args)) => commands::scan::run(args, &config),
        Some(Commands::Measure(args)) => commands::measure::run(args, &config),
        Some(Commands::Serve(args)) => commands::serve::run(args, &config),
        Some(Commands::Push(args)) => commands::push::run(args, &config),
        Some(Commands::Cascades(ref args)) => commands::cascades::run(args, &config),
        // Default behavior: scan with the flattened args
        None => commands::scan::run(cli.scan, &config),
    };

    match result {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error.into()
        }
    }
}
