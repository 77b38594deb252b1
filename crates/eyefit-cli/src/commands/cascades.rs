//! Cascades command - manage Haar cascade files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use eyefit_adapters::cascades::search_dirs;
use eyefit_adapters::{cascades_dir, fetch_cascades, list_cascades};
use indicatif::{ProgressBar, ProgressStyle};

use super::ExitCode;
use crate::config::AppConfig;

/// Arguments for the cascades command
#[derive(Args)]
pub struct CascadesArgs {
    /// Cascade directory [default: cascades.dir or the data directory]
    #[arg(long, value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CascadesCommand,
}

/// Cascades subcommands
#[derive(Subcommand)]
pub enum CascadesCommand {
    /// Download the face and eye cascades
    Fetch {
        /// Download again even if present
        #[arg(long)]
        force: bool,
    },
    /// Show where each cascade resolves
    List,
    /// Print the cascade directory path
    Path,
}

impl CascadesArgs {
    fn configured_dir(&self, config: &AppConfig) -> Option<PathBuf> {
        self.dir.clone().or_else(|| config.cascades.dir.clone())
    }
}

/// Run the cascades command.
pub fn run(args: &CascadesArgs, config: &AppConfig) -> Result<ExitCode> {
    let configured = args.configured_dir(config);
    match args.command {
        CascadesCommand::Fetch { force } => {
            fetch(configured.unwrap_or_else(cascades_dir), force)
        }
        CascadesCommand::List => Ok(list(configured.as_deref())),
        CascadesCommand::Path => {
            println!("{}", configured.unwrap_or_else(cascades_dir).display());
            Ok(ExitCode::Success)
        }
    }
}

fn fetch(dir: PathBuf, force: bool) -> Result<ExitCode> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?,
    );
    spinner.set_message(format!("Fetching cascades into {}", dir.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let fetched = fetch_cascades(&dir, force);
    spinner.finish_and_clear();

    for cascade in fetched? {
        let action = if cascade.downloaded {
            "downloaded"
        } else {
            "present"
        };
        println!("  ✓ {} ({action})", cascade.filename);
        println!("    sha256 {}", cascade.sha256);
    }
    println!();
    println!("Cascades directory: {}", dir.display());

    Ok(ExitCode::Success)
}

fn list(configured: Option<&Path>) -> ExitCode {
    let dirs = search_dirs(configured);
    let cascades = list_cascades(configured);

    println!("Search path:");
    for dir in &dirs {
        println!("  {}", dir.display());
    }
    println!();

    for (filename, path) in &cascades {
        match path {
            Some(path) => println!("  ✓ {filename} ({})", path.display()),
            None => println!("  ✗ {filename}"),
        }
    }

    println!();
    let found = cascades.iter().filter(|(_, path)| path.is_some()).count();
    println!("{}/{} cascades found", found, cascades.len());

    ExitCode::Success
}
