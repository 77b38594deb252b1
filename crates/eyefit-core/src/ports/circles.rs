//! Circle transform port.

use image::GrayImage;

use crate::domain::Circle;

/// Parameters for a Hough-gradient circle search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughParams {
    /// Inverse accumulator resolution.
    pub dp: f64,
    /// Minimum distance between detected centers.
    pub min_dist: f64,
    /// Upper Canny threshold.
    pub param1: f64,
    /// Accumulator threshold.
    pub param2: f64,
    /// Smallest radius searched.
    pub min_radius: i32,
    /// Largest radius searched.
    pub max_radius: i32,
}

impl HoughParams {
    /// Parameters tuned for the iris of an eye crop `height` pixels tall.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn iris(height: u32) -> Self {
        Self {
            dp: 1.0,
            min_dist: f64::from(height) / 2.0,
            param1: 50.0,
            param2: 30.0,
            min_radius: 5,
            max_radius: (height / 2) as i32,
        }
    }

    /// Parameters tuned for the pupil of an eye crop `height` pixels tall.
    #[must_use]
    pub fn pupil(height: u32) -> Self {
        Self {
            dp: 1.0,
            min_dist: f64::from(height) / 2.0,
            param1: 50.0,
            param2: 30.0,
            min_radius: 3,
            max_radius: 20,
        }
    }
}

/// Port for a generic circle-detection transform.
pub trait CircleFinder: Send {
    /// Finds circles in a (pre-smoothed) grayscale image.
    ///
    /// An empty vector means nothing was found and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_circles(
        &mut self,
        gray: &GrayImage,
        params: &HoughParams,
    ) -> anyhow::Result<Vec<Circle>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iris_params() {
        let p = HoughParams::iris(31);
        assert!((p.min_dist - 15.5).abs() < f64::EPSILON);
        assert_eq!(p.min_radius, 5);
        assert_eq!(p.max_radius, 15);
    }

    #[test]
    fn test_pupil_params() {
        let p = HoughParams::pupil(40);
        assert!((p.min_dist - 20.0).abs() < f64::EPSILON);
        assert_eq!(p.min_radius, 3);
        assert_eq!(p.max_radius, 20);
        assert!((p.param1 - 50.0).abs() < f64::EPSILON);
        assert!((p.param2 - 30.0).abs() < f64::EPSILON);
    }
}
