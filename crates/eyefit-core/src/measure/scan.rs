//! Batch-averaging scan over a frame stream.
//!
//! Measurements are collected in fixed-size batches. A run of frames without
//! any face discards the partial batch. When every batch completes, all
//! measurements are averaged into one summary.

use tracing::{debug, info, warn};

use crate::domain::{MeasureError, Measurement, ScanSummary};
use crate::ports::{FrameMeasurer, FrameSource, ProgressSink, ScanEvent};

/// Configuration for the batch scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Measurements per batch.
    pub frames_per_batch: usize,
    /// Number of batches in a session.
    pub batches: usize,
    /// Consecutive face-less frames after which a partial batch is discarded.
    pub lost_frame_threshold: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            frames_per_batch: 20,
            batches: 5,
            lost_frame_threshold: 10,
        }
    }
}

/// How a scan session ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanOutcome {
    /// Every batch completed.
    Completed(ScanSummary),
    /// The frame stream ended first.
    Incomplete {
        /// Batches completed before the stream ended.
        completed_batches: usize,
    },
}

/// Runs a full scan session.
///
/// Frame read errors are logged and skipped. Detection failures are reported
/// through `progress` and the next frame is sampled.
///
/// Each frame goes through the same single-shot measurement as an upload, so
/// the first qualifying face decides the frame: if it has fewer than two eyes
/// the frame is rejected and later faces in it are not tried.
///
/// # Errors
///
/// Returns an error if the configuration has zero-sized batches or if the
/// detection backend fails.
pub fn run_scan<S, M, P>(
    source: &mut S,
    measurer: &mut M,
    config: &ScanConfig,
    progress: &P,
) -> anyhow::Result<ScanOutcome>
where
    S: FrameSource + ?Sized,
    M: FrameMeasurer + ?Sized,
    P: ProgressSink + ?Sized,
{
    anyhow::ensure!(config.batches > 0, "scan needs at least one batch");
    anyhow::ensure!(
        config.frames_per_batch > 0,
        "scan needs at least one frame per batch"
    );

    let mut measurements: Vec<Measurement> =
        Vec::with_capacity(config.batches * config.frames_per_batch);

    for batch in 0..config.batches {
        info!("Starting measurement run {}/{}", batch + 1, config.batches);
        progress.on_event(ScanEvent::BatchStarted {
            batch,
            total: config.batches,
            frames: config.frames_per_batch,
        });

        if let Some(mut collected) = collect_batch(source, measurer, config, progress, batch)? {
            progress.on_event(ScanEvent::BatchCompleted { batch });
            measurements.append(&mut collected);
        } else {
            progress.on_event(ScanEvent::Finished {
                completed: batch,
                total: config.batches,
            });
            return Ok(ScanOutcome::Incomplete {
                completed_batches: batch,
            });
        }
    }

    progress.on_event(ScanEvent::Finished {
        completed: config.batches,
        total: config.batches,
    });

    let measurement = Measurement::average(&measurements)
        .ok_or_else(|| anyhow::anyhow!("no measurements collected"))?;

    Ok(ScanOutcome::Completed(ScanSummary {
        measurement,
        batches: config.batches,
        frames: measurements.len(),
    }))
}

/// Collects one batch, or `None` if the frame stream ends first.
fn collect_batch<S, M, P>(
    source: &mut S,
    measurer: &mut M,
    config: &ScanConfig,
    progress: &P,
    batch: usize,
) -> anyhow::Result<Option<Vec<Measurement>>>
where
    S: FrameSource + ?Sized,
    M: FrameMeasurer + ?Sized,
    P: ProgressSink + ?Sized,
{
    let mut measurements = Vec::with_capacity(config.frames_per_batch);
    let mut lost_frames = 0usize;

    while measurements.len() < config.frames_per_batch {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                warn!(
                    "Frame stream ended during run {} with {}/{} measurements",
                    batch + 1,
                    measurements.len(),
                    config.frames_per_batch
                );
                progress.on_event(ScanEvent::BatchAbandoned {
                    batch,
                    collected: measurements.len(),
                });
                return Ok(None);
            }
            Err(e) => {
                warn!("Failed to grab frame: {e:#}");
                continue;
            }
        };

        match measurer.measure(&frame) {
            Ok(measurement) => {
                lost_frames = 0;
                measurements.push(measurement);
                progress.on_event(ScanEvent::FrameMeasured {
                    batch,
                    collected: measurements.len(),
                });
            }
            Err(MeasureError::Backend(e)) => {
                return Err(e.context("detection backend failed during scan"));
            }
            Err(err) => {
                if matches!(err, MeasureError::NoFace) {
                    lost_frames += 1;
                    if lost_frames >= config.lost_frame_threshold && !measurements.is_empty() {
                        info!("Face lost for several frames. Resetting current measurement run.");
                        progress.on_event(ScanEvent::BatchReset {
                            batch,
                            discarded: measurements.len(),
                        });
                        measurements.clear();
                    }
                } else {
                    lost_frames = 0;
                }

                debug!("Frame rejected: {err}");
                progress.on_event(ScanEvent::FrameRejected {
                    batch,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(Some(measurements))
}
