//! Scan progress reporting using indicatif.

use eyefit_core::{ProgressSink, ScanEvent};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress adapter for the batch scan.
///
/// Shows one bar per run on a terminal and plain status lines otherwise.
pub struct ScanProgress {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl ScanProgress {
    /// Creates a progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show a progress bar; otherwise print status lines
    #[must_use]
    pub fn new(quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });

        Self { bar, quiet }
    }
}

impl ProgressSink for ScanProgress {
    fn on_event(&self, event: ScanEvent) {
        if self.quiet {
            return;
        }

        match event {
            ScanEvent::BatchStarted {
                batch,
                total,
                frames,
            } => {
                let label = format!("Run {}/{total}", batch + 1);
                if let Some(bar) = &self.bar {
                    bar.reset();
                    bar.set_length(frames as u64);
                    bar.set_prefix(label);
                    bar.set_message("");
                } else {
                    eprintln!("Starting measurement run {}/{total}...", batch + 1);
                }
            }
            ScanEvent::FrameMeasured { collected, .. } => {
                if let Some(bar) = &self.bar {
                    bar.set_position(collected as u64);
                }
            }
            ScanEvent::FrameRejected { reason, .. } => {
                if let Some(bar) = &self.bar {
                    bar.set_message(reason);
                }
            }
            ScanEvent::BatchReset { .. } => {
                let message = "Face lost for several frames. Resetting current measurement run.";
                if let Some(bar) = &self.bar {
                    bar.set_position(0);
                    bar.println(message);
                } else {
                    eprintln!("{message}");
                }
            }
            ScanEvent::BatchCompleted { batch } => {
                if let Some(bar) = &self.bar {
                    bar.println(format!("Run {} complete", batch + 1));
                } else {
                    eprintln!("Run {} complete", batch + 1);
                }
            }
            ScanEvent::BatchAbandoned { batch, collected } => {
                if let Some(bar) = &self.bar {
                    bar.abandon_with_message(format!("stopped with {collected} measurements"));
                } else {
                    eprintln!(
                        "Run {} stopped with {collected} measurements",
                        batch + 1
                    );
                }
            }
            ScanEvent::Finished { completed, total } => {
                if let Some(bar) = &self.bar {
                    bar.finish_and_clear();
                }
                eprintln!("Completed {completed}/{total} runs");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_ignores_events() {
        let progress = ScanProgress::new(true, true);
        assert!(progress.bar.is_none());
        progress.on_event(ScanEvent::BatchCompleted { batch: 0 });
    }

    #[test]
    fn test_bar_tracks_batch() {
        let progress = ScanProgress::new(false, true);
        progress.on_event(ScanEvent::BatchStarted {
            batch: 1,
            total: 5,
            frames: 20,
        });
        progress.on_event(ScanEvent::FrameMeasured {
            batch: 1,
            collected: 7,
        });

        let bar = progress.bar.as_ref().map(|b| (b.length(), b.position()));
        assert_eq!(bar, Some((Some(20), 7)));

        progress.on_event(ScanEvent::BatchReset {
            batch: 1,
            discarded: 7,
        });
        assert_eq!(progress.bar.as_ref().map(ProgressBar::position), Some(0));
    }
}
