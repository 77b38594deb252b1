//! Measurement configuration.

use super::calculator::KNOWN_DISTANCE_MM;
use super::placement::CenteringPolicy;

/// Configuration for single-frame measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureConfig {
    /// Interpupillary distance the pixel scale is calibrated against.
    pub known_distance_mm: f64,

    /// Allowed offset of the face center from the frame center, as a
    /// fraction of frame width/height.
    pub center_tolerance: f64,

    /// Minimum face height as a fraction of frame height.
    pub min_face_height_ratio: f64,

    /// Fail with [`MeasureError::DegenerateScale`](crate::MeasureError::DegenerateScale)
    /// instead of falling back to a 1:1 pixel-to-millimeter ratio when the
    /// interpupillary pixel distance is not positive.
    pub reject_degenerate_scale: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            known_distance_mm: KNOWN_DISTANCE_MM,
            center_tolerance: 0.2,
            min_face_height_ratio: 0.3,
            reject_degenerate_scale: false,
        }
    }
}

impl MeasureConfig {
    /// The face placement policy described by this configuration.
    #[must_use]
    pub const fn centering(&self) -> CenteringPolicy {
        CenteringPolicy {
            tolerance: self.center_tolerance,
            min_height_ratio: self.min_face_height_ratio,
        }
    }

    /// Sets the calibration distance.
    #[must_use]
    pub const fn with_known_distance(mut self, known_distance_mm: f64) -> Self {
        self.known_distance_mm = known_distance_mm;
        self
    }

    /// Turns the degenerate-scale fallback into an error.
    #[must_use]
    pub const fn rejecting_degenerate_scale(mut self) -> Self {
        self.reject_degenerate_scale = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MeasureConfig::default();
        assert!((config.known_distance_mm - 63.0).abs() < f64::EPSILON);
        assert!((config.center_tolerance - 0.2).abs() < f64::EPSILON);
        assert!((config.min_face_height_ratio - 0.3).abs() < f64::EPSILON);
        assert!(!config.reject_degenerate_scale);
    }

    #[test]
    fn test_config_builder() {
        let config = MeasureConfig::default()
            .with_known_distance(60.0)
            .rejecting_degenerate_scale();
        assert!((config.known_distance_mm - 60.0).abs() < f64::EPSILON);
        assert!(config.reject_degenerate_scale);
    }
}
