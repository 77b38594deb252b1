//! Detection backend and camera construction.
//!
//! The OpenCV backend is only available when built with `--features opencv`.

use anyhow::Result;
use eyefit_core::{FrameMeasurer, FrameSource, MeasureConfig};

use crate::config::CascadesSection;

/// Which cascade parameters to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Uploaded photos and single images.
    SingleShot,
    /// Live webcam scanning.
    Scan,
}

/// Camera options for a live scan.
#[derive(Debug, Clone, Copy)]
pub struct CameraOptions {
    /// Device index.
    pub index: i32,
    /// Flip frames horizontally.
    pub mirror: bool,
    /// Show the alignment window.
    pub preview: bool,
    /// Seconds to count down before the first frame.
    pub countdown_secs: u32,
}

#[cfg(not(feature = "opencv"))]
const NO_BACKEND: &str =
    "this build has no detection backend; rebuild with `--features opencv` (requires a system OpenCV)";

/// Builds the measurer for `mode`, loading the Haar cascades once.
///
/// # Errors
///
/// Returns an error if the cascades cannot be found or loaded, or if no
/// detection backend was compiled in.
#[cfg(feature = "opencv")]
pub fn measurer(
    mode: Mode,
    cascades: &CascadesSection,
    config: MeasureConfig,
) -> Result<Box<dyn FrameMeasurer>> {
    use eyefit_adapters::cv::{DetectionProfile, HaarCascadeDetector, HoughCircleFinder};
    use eyefit_adapters::locate_cascades;
    use eyefit_core::Measurer;

    let paths = locate_cascades(
        cascades.dir.as_deref(),
        cascades.face.as_deref(),
        cascades.eye.as_deref(),
    )?;
    let profile = match mode {
        Mode::SingleShot => DetectionProfile::SINGLE_SHOT,
        Mode::Scan => DetectionProfile::SCAN,
    };
    let detector = HaarCascadeDetector::load(&paths.face, &paths.eye, profile)?;
    tracing::info!("Loaded {mode:?} detector from {}", paths.face.display());

    Ok(Box::new(Measurer::new(detector, HoughCircleFinder, config)))
}

/// Builds the measurer for `mode`, loading the Haar cascades once.
///
/// # Errors
///
/// Always fails: no detection backend was compiled in.
#[cfg(not(feature = "opencv"))]
pub fn measurer(
    mode: Mode,
    _cascades: &CascadesSection,
    _config: MeasureConfig,
) -> Result<Box<dyn FrameMeasurer>> {
    tracing::debug!("Requested {mode:?} detector");
    anyhow::bail!(NO_BACKEND)
}

/// Opens the camera and runs the countdown.
///
/// # Errors
///
/// Returns an error if the camera cannot be opened.
#[cfg(feature = "opencv")]
pub fn camera(options: CameraOptions) -> Result<Box<dyn FrameSource>> {
    use eyefit_adapters::cv::CameraFrameSource;

    let mut camera = CameraFrameSource::open(options.index)?
        .mirrored(options.mirror)
        .with_preview(options.preview)?;
    camera.countdown(options.countdown_secs)?;
    Ok(Box::new(camera))
}

/// Opens the camera and runs the countdown.
///
/// # Errors
///
/// Always fails: no camera backend was compiled in.
#[cfg(not(feature = "opencv"))]
pub fn camera(options: CameraOptions) -> Result<Box<dyn FrameSource>> {
    let CameraOptions {
        index,
        mirror,
        preview,
        countdown_secs,
    } = options;
    tracing::debug!(index, mirror, preview, countdown_secs, "Requested camera");
    anyhow::bail!(NO_BACKEND)
}
