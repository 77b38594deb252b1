//! Face and eye localization port.

use image::GrayImage;

use crate::domain::Rect;

/// Port for a pretrained frontal-face and eye detector.
///
/// Candidates are returned in the detector's own order; no ranking is implied.
pub trait FaceEyeDetector: Send {
    /// Detects face candidates in a full grayscale frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn detect_faces(&mut self, gray: &GrayImage) -> anyhow::Result<Vec<Rect>>;

    /// Detects eye candidates in a grayscale face sub-image.
    ///
    /// Returned rectangles are relative to `face`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn detect_eyes(&mut self, face: &GrayImage) -> anyhow::Result<Vec<Rect>>;
}
