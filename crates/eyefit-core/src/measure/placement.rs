//! Face placement policy.

use crate::domain::Rect;

/// Accepts a face only when it is centered in the frame and large enough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenteringPolicy {
    /// Allowed center offset as a fraction of frame width/height.
    pub tolerance: f64,
    /// Minimum face height as a fraction of frame height.
    pub min_height_ratio: f64,
}

impl Default for CenteringPolicy {
    fn default() -> Self {
        Self {
            tolerance: 0.2,
            min_height_ratio: 0.3,
        }
    }
}

impl CenteringPolicy {
    /// Whether `face` is centered and large enough in a frame of the given size.
    ///
    /// Both the face center and the frame center use integer halving; the
    /// center must lie strictly inside the tolerance band.
    #[must_use]
    pub fn accepts(&self, face: &Rect, frame_width: u32, frame_height: u32) -> bool {
        let (center_x, center_y) = face.center();
        let (center_x, center_y) = (f64::from(center_x), f64::from(center_y));

        let mid_x = f64::from(frame_width / 2);
        let mid_y = f64::from(frame_height / 2);
        let tolerance_x = f64::from(frame_width) * self.tolerance;
        let tolerance_y = f64::from(frame_height) * self.tolerance;
        let min_face_height = f64::from(frame_height) * self.min_height_ratio;

        (mid_x - tolerance_x < center_x && center_x < mid_x + tolerance_x)
            && (mid_y - tolerance_y < center_y && center_y < mid_y + tolerance_y)
            && f64::from(face.height) > min_face_height
    }
}
