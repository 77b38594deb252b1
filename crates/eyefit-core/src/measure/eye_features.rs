//! Iris and pupil estimation from eye crops.
//!
//! Each crop is converted to grayscale and median-smoothed once, then handed
//! to the circle finder twice: with iris parameters and with pupil
//! parameters. Only the first circle of each search is used.

use image::{GrayImage, RgbImage};
use tracing::trace;

use crate::domain::{IrisBoundary, PupilCenter};
use crate::ports::{CircleFinder, HoughParams};

use super::luma::to_gray;

/// Median filter window radius (5x5 window).
const MEDIAN_RADIUS: u32 = 2;

/// Grayscale, median-smoothed version of an eye crop.
///
/// Returns `None` for an empty crop.
#[must_use]
pub fn prepare_eye_crop(crop: &RgbImage) -> Option<GrayImage> {
    if crop.width() == 0 || crop.height() == 0 {
        return None;
    }

    let gray = to_gray(crop);
    Some(imageproc::filter::median_filter(
        &gray,
        MEDIAN_RADIUS,
        MEDIAN_RADIUS,
    ))
}

/// Estimates the horizontal iris extent in a prepared eye crop.
///
/// # Errors
///
/// Returns an error if the circle finder fails.
pub fn estimate_iris<C>(finder: &mut C, gray: &GrayImage) -> anyhow::Result<Option<IrisBoundary>>
where
    C: CircleFinder + ?Sized,
{
    let circles = finder.find_circles(gray, &HoughParams::iris(gray.height()))?;
    trace!("Iris search found {} circles", circles.len());

    Ok(circles.first().map(|circle| {
        let (x, _, r) = circle.rounded();
        IrisBoundary {
            left: x - r,
            right: x + r,
        }
    }))
}

/// Estimates the pupil center in a prepared eye crop.
///
/// # Errors
///
/// Returns an error if the circle finder fails.
pub fn estimate_pupil<C>(finder: &mut C, gray: &GrayImage) -> anyhow::Result<Option<PupilCenter>>
where
    C: CircleFinder + ?Sized,
{
    let circles = finder.find_circles(gray, &HoughParams::pupil(gray.height()))?;
    trace!("Pupil search found {} circles", circles.len());

    Ok(circles.first().map(|circle| {
        let (x, y, _) = circle.rounded();
        PupilCenter { x, y }
    }))
}

/// Runs both estimates on one eye crop.
///
/// # Errors
///
/// Returns an error if the circle finder fails.
pub fn estimate_eye<C>(
    finder: &mut C,
    crop: &RgbImage,
) -> anyhow::Result<(Option<IrisBoundary>, Option<PupilCenter>)>
where
    C: CircleFinder + ?Sized,
{
    let Some(gray) = prepare_eye_crop(crop) else {
        return Ok((None, None));
    };

    let iris = estimate_iris(finder, &gray)?;
    let pupil = estimate_pupil(finder, &gray)?;
    Ok((iris, pupil))
}
