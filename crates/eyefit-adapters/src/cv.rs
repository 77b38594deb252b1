//! OpenCV backend: Haar cascade detector, Hough circle finder and camera.
//!
//! Only built with the `opencv` feature, which needs a system OpenCV
//! installation.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use eyefit_core::{Circle, CircleFinder, FaceEyeDetector, FrameSource, HoughParams, Rect};
use image::{GrayImage, RgbImage};
use opencv::core::{self, Mat, Point, Scalar, Size, Vec3f, Vector};
use opencv::prelude::*;
use opencv::{highgui, imgproc, objdetect, videoio};
use tracing::{debug, info, warn};

const WINDOW_NAME: &str = "Face Alignment & Measurement";

/// Cascade search parameters for one acquisition mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionProfile {
    /// Face pyramid scale step.
    pub face_scale: f64,
    /// Face neighbor threshold.
    pub face_neighbors: i32,
    /// Smallest face searched, in pixels (square).
    pub face_min_size: i32,
    /// Eye pyramid scale step.
    pub eye_scale: f64,
    /// Eye neighbor threshold.
    pub eye_neighbors: i32,
    /// Smallest eye searched, in pixels (square).
    pub eye_min_size: i32,
}

impl DetectionProfile {
    /// Tuned for single uploaded photos.
    pub const SINGLE_SHOT: Self = Self {
        face_scale: 1.1,
        face_neighbors: 4,
        face_min_size: 50,
        eye_scale: 1.1,
        eye_neighbors: 3,
        eye_min_size: 20,
    };

    /// Tuned for live webcam scanning.
    pub const SCAN: Self = Self {
        face_scale: 1.3,
        face_neighbors: 5,
        face_min_size: 100,
        eye_scale: 1.2,
        eye_neighbors: 5,
        eye_min_size: 30,
    };
}

/// Face and eye detector backed by two Haar cascades.
pub struct HaarCascadeDetector {
    face: objdetect::CascadeClassifier,
    eye: objdetect::CascadeClassifier,
    profile: DetectionProfile,
}

impl HaarCascadeDetector {
    /// Loads both cascades.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be loaded as a cascade.
    pub fn load(face: &Path, eye: &Path, profile: DetectionProfile) -> Result<Self> {
        Ok(Self {
            face: load_cascade(face)?,
            eye: load_cascade(eye)?,
            profile,
        })
    }

    /// Returns the active detection profile.
    #[must_use]
    pub const fn profile(&self) -> &DetectionProfile {
        &self.profile
    }
}

fn load_cascade(path: &Path) -> Result<objdetect::CascadeClassifier> {
    let name = path.to_string_lossy();
    let cascade = objdetect::CascadeClassifier::new(&name)
        .with_context(|| format!("Failed to load cascade {name}"))?;
    anyhow::ensure!(!cascade.empty()?, "Cascade {name} is empty or invalid");
    debug!("Loaded cascade {name}");
    Ok(cascade)
}

fn detect(
    cascade: &mut objdetect::CascadeClassifier,
    gray: &GrayImage,
    scale: f64,
    neighbors: i32,
    min_size: i32,
) -> Result<Vec<Rect>> {
    let mat = to_mat(gray.as_raw(), gray.height(), 1)?;
    let mut found = Vector::<core::Rect>::new();
    cascade.detect_multi_scale(
        &mat,
        &mut found,
        scale,
        neighbors,
        0,
        Size::new(min_size, min_size),
        Size::new(0, 0),
    )?;
    Ok(found
        .iter()
        .map(|r| Rect::new(r.x, r.y, r.width, r.height))
        .collect())
}

impl FaceEyeDetector for HaarCascadeDetector {
    fn detect_faces(&mut self, gray: &GrayImage) -> Result<Vec<Rect>> {
        let p = self.profile;
        detect(
            &mut self.face,
            gray,
            p.face_scale,
            p.face_neighbors,
            p.face_min_size,
        )
    }

    fn detect_eyes(&mut self, face: &GrayImage) -> Result<Vec<Rect>> {
        let p = self.profile;
        detect(
            &mut self.eye,
            face,
            p.eye_scale,
            p.eye_neighbors,
            p.eye_min_size,
        )
    }
}

/// Hough-gradient circle finder.
#[derive(Debug, Default, Clone, Copy)]
pub struct HoughCircleFinder;

impl CircleFinder for HoughCircleFinder {
    fn find_circles(&mut self, gray: &GrayImage, params: &HoughParams) -> Result<Vec<Circle>> {
        let mat = to_mat(gray.as_raw(), gray.height(), 1)?;
        let mut circles = Vector::<Vec3f>::new();
        imgproc::hough_circles(
            &mat,
            &mut circles,
            imgproc::HOUGH_GRADIENT,
            params.dp,
            params.min_dist,
            params.param1,
            params.param2,
            params.min_radius,
            params.max_radius,
        )?;
        Ok(circles
            .iter()
            .map(|c| Circle::new(c[0], c[1], c[2]))
            .collect())
    }
}

/// Live camera frame source.
///
/// The device is released when the source is dropped.
pub struct CameraFrameSource {
    capture: videoio::VideoCapture,
    mirror: bool,
    preview: bool,
}

impl CameraFrameSource {
    /// Opens camera `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened.
    pub fn open(index: i32) -> Result<Self> {
        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
            .with_context(|| format!("Failed to open camera {index}"))?;
        anyhow::ensure!(capture.is_opened()?, "Camera {index} could not be opened");
        info!("Opened camera {index}");

        Ok(Self {
            capture,
            mirror: true,
            preview: false,
        })
    }

    /// Sets whether frames are flipped horizontally.
    #[must_use]
    pub const fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Shows every frame in a window with an alignment oval; `q` quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be created.
    pub fn with_preview(mut self, preview: bool) -> Result<Self> {
        if preview {
            highgui::named_window(WINDOW_NAME, highgui::WINDOW_AUTOSIZE)?;
        }
        self.preview = preview;
        Ok(self)
    }

    /// Announces the start of measurement over `seconds` seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the preview window cannot be updated.
    pub fn countdown(&mut self, seconds: u32) -> Result<()> {
        for remaining in (1..=seconds).rev() {
            let message = format!("Starting in {remaining}...");
            info!("{message}");

            if self.preview {
                if let Some(mut frame) = self.grab()? {
                    let origin = Point::new(frame.cols() / 3, frame.rows() / 2);
                    imgproc::put_text_def(
                        &mut frame,
                        &message,
                        origin,
                        imgproc::FONT_HERSHEY_SIMPLEX,
                        2.0,
                        Scalar::new(0.0, 0.0, 255.0, 0.0),
                    )?;
                    highgui::imshow(WINDOW_NAME, &frame)?;
                }
                highgui::wait_key(1000)?;
            } else {
                std::thread::sleep(Duration::from_secs(1));
            }
        }
        Ok(())
    }

    /// Reads one BGR frame, mirrored if configured.
    fn grab(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        if !self.mirror {
            return Ok(Some(frame));
        }
        let mut flipped = Mat::default();
        core::flip(&frame, &mut flipped, 1)?;
        Ok(Some(flipped))
    }

    /// Draws the alignment oval and polls the quit key.
    fn show(&self, frame: &Mat) -> Result<bool> {
        let mut canvas = frame.try_clone()?;
        let (w, h) = (canvas.cols(), canvas.rows());
        imgproc::ellipse(
            &mut canvas,
            Point::new(w / 2, h / 2),
            Size::new(w / 5, h / 4),
            0.0,
            0.0,
            360.0,
            Scalar::new(255.0, 255.0, 255.0, 0.0),
            2,
            imgproc::LINE_8,
            0,
        )?;
        highgui::imshow(WINDOW_NAME, &canvas)?;
        let key = highgui::wait_key(1)?;
        Ok(key & 0xFF == i32::from(b'q'))
    }
}

impl FrameSource for CameraFrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let frame = self.grab()?.context("Failed to grab frame")?;

        if self.preview && self.show(&frame)? {
            info!("Quit requested");
            return Ok(None);
        }

        bgr_to_rgb_image(&frame).map(Some)
    }
}

impl Drop for CameraFrameSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            warn!("Failed to release camera: {e}");
        }
        if self.preview {
            if let Err(e) = highgui::destroy_all_windows() {
                warn!("Failed to close preview window: {e}");
            }
        }
    }
}

/// Wraps an interleaved 8-bit buffer as a `rows x (len / rows / channels)` matrix.
fn to_mat(data: &[u8], rows: u32, channels: i32) -> Result<Mat> {
    let rows = i32::try_from(rows).context("image too tall")?;
    let flat = Mat::from_slice(data)?;
    let shaped = flat.reshape(channels, rows)?;
    Ok(shaped.try_clone()?)
}

fn bgr_to_rgb_image(frame: &Mat) -> Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(frame, &mut rgb, imgproc::COLOR_BGR2RGB)?;
    let width = u32::try_from(rgb.cols()).context("negative frame width")?;
    let height = u32::try_from(rgb.rows()).context("negative frame height")?;
    RgbImage::from_raw(width, height, rgb.data_bytes()?.to_vec())
        .context("frame buffer does not match its dimensions")
}
