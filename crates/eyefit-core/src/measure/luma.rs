//! RGB to grayscale conversion.
//!
//! Uses BT.601 weights in 14-bit fixed point, rounding half up, which is
//! what OpenCV's `COLOR_RGB2GRAY` / `COLOR_BGR2GRAY` produce for 8-bit
//! images. The Haar cascades and the Hough transform are tuned for that
//! input.

use image::{GrayImage, Luma, RgbImage};

const SHIFT: u32 = 14;
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;

/// Gray level of one RGB pixel.
#[must_use]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn bt601_luma(rgb: [u8; 3]) -> u8 {
    let sum = rgb[0] as u32 * R_WEIGHT
        + rgb[1] as u32 * G_WEIGHT
        + rgb[2] as u32 * B_WEIGHT
        + (1 << (SHIFT - 1));
    // weights sum to 1 << SHIFT, so the result fits in a u8
    (sum >> SHIFT) as u8
}

/// Converts a color frame to grayscale with BT.601 weights.
#[must_use]
pub fn to_gray(frame: &RgbImage) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        Luma([bt601_luma(frame.get_pixel(x, y).0)])
    })
}
