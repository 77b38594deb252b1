//! Single-frame measurement pipeline.

use image::{imageops, RgbImage};
use tracing::debug;

use crate::domain::{IrisBoundary, MeasureError, Measurement, PupilCenter, Rect};
use crate::ports::{CircleFinder, FaceEyeDetector, FrameMeasurer};

use super::calculator::{compute_measurement, EyeEstimates};
use super::eye_features::estimate_eye;
use super::luma::to_gray;
use super::MeasureConfig;

/// Measures frames using an explicitly owned detector and circle finder.
///
/// Both backends are created once by the caller and reused for every frame.
pub struct Measurer<D, C> {
    detector: D,
    circles: C,
    config: MeasureConfig,
}

impl<D, C> Measurer<D, C>
where
    D: FaceEyeDetector,
    C: CircleFinder,
{
    /// Creates a measurer from its backends and configuration.
    #[must_use]
    pub const fn new(detector: D, circles: C, config: MeasureConfig) -> Self {
        Self {
            detector,
            circles,
            config,
        }
    }

    /// Returns the measurement configuration.
    #[must_use]
    pub const fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Measures one frame.
    ///
    /// Faces are visited in detector order and the first one that is centered
    /// and large enough is used. Within it the two leftmost eye candidates
    /// are taken as left and right eye.
    ///
    /// # Errors
    ///
    /// Returns the detection failure that prevented a measurement, or
    /// [`MeasureError::Backend`] if a backend call failed.
    pub fn measure_frame(&mut self, frame: &RgbImage) -> Result<Measurement, MeasureError> {
        let (frame_width, frame_height) = frame.dimensions();
        let gray = to_gray(frame);

        let faces = self
            .detector
            .detect_faces(&gray)
            .map_err(MeasureError::Backend)?;
        debug!("Found {} face candidates", faces.len());

        if faces.is_empty() {
            return Err(MeasureError::NoFace);
        }

        let policy = self.config.centering();
        let face = faces
            .iter()
            .find(|face| policy.accepts(face, frame_width, frame_height))
            .ok_or(MeasureError::NoCenteredFace)?;
        let (fx, fy, fw, fh) = face
            .clamp_to(frame_width, frame_height)
            .ok_or(MeasureError::NoCenteredFace)?;
        debug!("Using face at {:?}", face);

        let face_gray = imageops::crop_imm(&gray, fx, fy, fw, fh).to_image();
        let face_color = imageops::crop_imm(frame, fx, fy, fw, fh).to_image();

        let mut eyes = self
            .detector
            .detect_eyes(&face_gray)
            .map_err(MeasureError::Backend)?;
        debug!("Found {} eye candidates", eyes.len());

        if eyes.len() < 2 {
            return Err(MeasureError::NotEnoughEyes);
        }

        eyes.sort_by_key(|eye| eye.x);
        let (left, right) = (eyes[0], eyes[1]);

        let estimates = self
            .estimate(&face_color, &left, &right)
            .map_err(MeasureError::Backend)?;
        debug!(
            "Eye estimates for left {:?} / right {:?}: {:?}",
            left, right, estimates
        );

        compute_measurement(&left, &right, &estimates, &self.config)
    }

    /// Runs iris and pupil estimation on both eye crops.
    fn estimate(
        &mut self,
        face: &RgbImage,
        left: &Rect,
        right: &Rect,
    ) -> anyhow::Result<EyeEstimates> {
        let (left_iris, left_pupil) = self.estimate_one(face, left)?;
        let (right_iris, right_pupil) = self.estimate_one(face, right)?;

        Ok(EyeEstimates {
            left_iris,
            right_iris,
            left_pupil,
            right_pupil,
        })
    }

    fn estimate_one(
        &mut self,
        face: &RgbImage,
        eye: &Rect,
    ) -> anyhow::Result<(Option<IrisBoundary>, Option<PupilCenter>)> {
        let Some((x, y, w, h)) = eye.clamp_to(face.width(), face.height()) else {
            return Ok((None, None));
        };

        let crop = imageops::crop_imm(face, x, y, w, h).to_image();
        estimate_eye(&mut self.circles, &crop)
    }
}

impl<D, C> FrameMeasurer for Measurer<D, C>
where
    D: FaceEyeDetector,
    C: CircleFinder,
{
    fn measure(&mut self, frame: &RgbImage) -> Result<Measurement, MeasureError> {
        self.measure_frame(frame)
    }
}
