//! Pixel-to-millimeter measurement arithmetic.
//!
//! Everything here is pure: the inputs are the two eye rectangles (relative
//! to the face sub-image) and whatever iris/pupil estimates were obtained for
//! them.

use crate::domain::{round2, IrisBoundary, MeasureError, Measurement, PupilCenter, Rect};

use super::MeasureConfig;

/// Average adult interpupillary distance used for calibration.
pub const KNOWN_DISTANCE_MM: f64 = 63.0;

/// Lens height is capped at this fraction of the eye region's width.
const B_SIZE_WIDTH_FACTOR: f64 = 0.6;

/// Iris and pupil estimates for both eyes. Any of them may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EyeEstimates {
    /// Iris extent in the left eye.
    pub left_iris: Option<IrisBoundary>,
    /// Iris extent in the right eye.
    pub right_iris: Option<IrisBoundary>,
    /// Pupil center in the left eye.
    pub left_pupil: Option<PupilCenter>,
    /// Pupil center in the right eye.
    pub right_pupil: Option<PupilCenter>,
}

impl EyeEstimates {
    /// Whether all four estimates are present, enabling the circle-based path.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.left_iris.is_some()
            && self.right_iris.is_some()
            && self.left_pupil.is_some()
            && self.right_pupil.is_some()
    }
}

/// Millimeters per pixel given an interpupillary pixel distance.
///
/// Non-positive distances yield a ratio of exactly 1.
#[must_use]
pub fn pixel_to_mm_ratio(known_distance_mm: f64, interpupil_px: f64) -> f64 {
    if interpupil_px > 0.0 {
        known_distance_mm / interpupil_px
    } else {
        1.0
    }
}

/// Computes a measurement from two eye regions ordered left to right.
///
/// Uses the iris edges and pupil centers when all four estimates are present,
/// and the eye rectangles alone otherwise.
///
/// # Errors
///
/// Returns [`MeasureError::DegenerateScale`] only when
/// `config.reject_degenerate_scale` is set and the interpupillary pixel
/// distance is not positive.
pub fn compute_measurement(
    left: &Rect,
    right: &Rect,
    estimates: &EyeEstimates,
    config: &MeasureConfig,
) -> Result<Measurement, MeasureError> {
    let (eye_width_px, interpupil_px) = match (
        estimates.left_iris,
        estimates.right_iris,
        estimates.left_pupil,
        estimates.right_pupil,
    ) {
        (Some(left_iris), Some(right_iris), Some(left_pupil), Some(right_pupil)) => {
            let total_width = (right.x + right_iris.right) - (left.x + left_iris.left);
            let interpupil = (right.x + right_pupil.x) - (left.x + left_pupil.x);
            (f64::from(total_width), f64::from(interpupil))
        }
        _ => {
            let avg_width = f64::from(left.width + right.width) / 2.0;
            let left_center = f64::from(left.x) + f64::from(left.width) / 2.0;
            let right_center = f64::from(right.x) + f64::from(right.width) / 2.0;
            (avg_width, right_center - left_center)
        }
    };

    if interpupil_px <= 0.0 && config.reject_degenerate_scale {
        return Err(MeasureError::DegenerateScale { interpupil_px });
    }
    let ratio = pixel_to_mm_ratio(config.known_distance_mm, interpupil_px);

    let bridge_px = f64::from(right.x - left.right());
    let b_size_px = f64::from(lens_height_px(left).max(lens_height_px(right)));

    Ok(Measurement {
        eye_width_mm: round2(eye_width_px * ratio),
        bridge_width_mm: round2(bridge_px * ratio),
        b_size_mm: round2(b_size_px * ratio),
    })
}

/// Eye region height capped by a fraction of its width, truncated to whole pixels.
#[allow(clippy::cast_possible_truncation)]
fn lens_height_px(eye: &Rect) -> i32 {
    let capped = (f64::from(eye.width) * B_SIZE_WIDTH_FACTOR) as i32;
    eye.height.min(capped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn estimates(
        left_iris: (i32, i32),
        right_iris: (i32, i32),
        left_pupil: i32,
        right_pupil: i32,
    ) -> EyeEstimates {
        EyeEstimates {
            left_iris: Some(IrisBoundary {
                left: left_iris.0,
                right: left_iris.1,
            }),
            right_iris: Some(IrisBoundary {
                left: right_iris.0,
                right: right_iris.1,
            }),
            left_pupil: Some(PupilCenter {
                x: left_pupil,
                y: 10,
            }),
            right_pupil: Some(PupilCenter {
                x: right_pupil,
                y: 10,
            }),
        }
    }

    #[test]
    fn test_ratio_positive() {
        assert!(close(pixel_to_mm_ratio(63.0, 70.0), 0.9));
    }

    #[test]
    fn test_ratio_non_positive_is_exactly_one() {
        assert!(pixel_to_mm_ratio(63.0, 0.0).to_bits() == 1.0_f64.to_bits());
        assert!(pixel_to_mm_ratio(63.0, -12.5).to_bits() == 1.0_f64.to_bits());
    }

    #[test]
    fn test_fallback_path_reference_values() {
        // interpupil = (80 + 14) - (10 + 15) = 69, bridge = 80 - 40 = 40
        let left = Rect::new(10, 10, 30, 30);
        let right = Rect::new(80, 12, 28, 28);
        let config = MeasureConfig::default();

        let m = compute_measurement(&left, &right, &EyeEstimates::default(), &config)
            .unwrap_or_else(|e| panic!("unexpected error: {e}"));

        let ratio = 63.0 / 69.0;
        assert!(close(m.bridge_width_mm, round2(40.0 * ratio)));
        assert!(close(m.bridge_width_mm, 36.52));
        // avg width 29
        assert!(close(m.eye_width_mm, 26.48));
        // max(min(30, 18), min(28, 16)) = 18
        assert!(close(m.b_size_mm, 16.43));
    }

    #[test]
    fn test_primary_path() {
        let left = Rect::new(10, 10, 30, 30);
        let right = Rect::new(80, 12, 30, 30);
        // left iris starts at 10 + 5, right iris ends at 80 + 25 -> 90 px
        // pupils at 10 + 15 and 80 + 15 -> 70 px
        let est = estimates((5, 25), (5, 25), 15, 15);
        let config = MeasureConfig::default();

        let m = compute_measurement(&left, &right, &est, &config)
            .unwrap_or_else(|e| panic!("unexpected error: {e}"));

        assert!(close(m.eye_width_mm, 81.0));
        assert!(close(m.bridge_width_mm, 36.0));
        assert!(close(m.b_size_mm, 16.2));
    }

    #[test]
    fn test_fallback_when_any_estimate_missing() {
        let left = Rect::new(10, 10, 30, 30);
        let right = Rect::new(80, 12, 30, 30);
        let config = MeasureConfig::default();
        let complete = estimates((5, 25), (5, 25), 15, 15);
        let fallback =
            compute_measurement(&left, &right, &EyeEstimates::default(), &config).ok();

        let mut variants = Vec::new();
        for i in 0..4 {
            let mut est = complete;
            match i {
                0 => est.left_iris = None,
                1 => est.right_iris = None,
                2 => est.left_pupil = None,
                _ => est.right_pupil = None,
            }
            assert!(!est.is_complete());
            variants.push(compute_measurement(&left, &right, &est, &config).ok());
        }

        for v in variants {
            assert_eq!(v, fallback);
        }
        assert!(complete.is_complete());
    }

    #[test]
    fn test_eye_width_linear_in_total_width() {
        let left = Rect::new(0, 0, 40, 40);
        let right = Rect::new(100, 0, 40, 40);
        let config = MeasureConfig::default();

        // interpupil fixed at 100 + 20 - 20 = 100 px -> ratio 0.63
        let narrow = compute_measurement(&left, &right, &estimates((10, 30), (10, 30), 20, 20), &config)
            .unwrap_or_else(|e| panic!("{e}"));
        let wide = compute_measurement(&left, &right, &estimates((0, 30), (10, 40), 20, 20), &config)
            .unwrap_or_else(|e| panic!("{e}"));

        // total widths 120 px and 140 px
        assert!(close(narrow.eye_width_mm, 75.6));
        assert!(close(wide.eye_width_mm, 88.2));
    }

    #[test]
    fn test_degenerate_interpupil_falls_back_to_unit_ratio() {
        let left = Rect::new(50, 0, 20, 20);
        let right = Rect::new(50, 0, 20, 20);
        let config = MeasureConfig::default();

        let m = compute_measurement(&left, &right, &EyeEstimates::default(), &config)
            .unwrap_or_else(|e| panic!("{e}"));

        assert!(close(m.eye_width_mm, 20.0));
        assert!(close(m.bridge_width_mm, -20.0));
        assert!(close(m.b_size_mm, 12.0));
    }

    #[test]
    fn test_degenerate_interpupil_rejected_when_configured() {
        let left = Rect::new(50, 0, 20, 20);
        let right = Rect::new(50, 0, 20, 20);
        let config = MeasureConfig::default().rejecting_degenerate_scale();

        let err = compute_measurement(&left, &right, &EyeEstimates::default(), &config);
        assert!(matches!(
            err,
            Err(MeasureError::DegenerateScale { interpupil_px }) if interpupil_px == 0.0
        ));
    }

    #[test]
    fn test_lens_height_capped_by_width() {
        assert_eq!(lens_height_px(&Rect::new(0, 0, 30, 30)), 18);
        assert_eq!(lens_height_px(&Rect::new(0, 0, 28, 28)), 16);
        assert_eq!(lens_height_px(&Rect::new(0, 0, 50, 12)), 12);
    }
}
