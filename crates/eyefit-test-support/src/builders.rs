//! Synthetic frame builders for testing.

use std::io::Cursor;

use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Builder for synthetic camera frames and upload payloads.
pub struct SyntheticFrameBuilder;

impl SyntheticFrameBuilder {
    /// Creates a uniform mid-gray frame.
    #[must_use]
    pub fn blank(width: u32, height: u32) -> RgbImage {
        Self::uniform(width, height, [128, 128, 128])
    }

    /// Creates a frame filled with one color.
    #[must_use]
    pub fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(rgb))
    }

    /// Creates a light frame with a dark rectangle where a face would be.
    ///
    /// Only useful for checking that crops land where expected; no real
    /// detector will find a face in it.
    #[must_use]
    pub fn with_patch(width: u32, height: u32, x: u32, y: u32, w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |px, py| {
            if px >= x && px < x + w && py >= y && py < y + h {
                Rgb([40, 40, 40])
            } else {
                Rgb([220, 220, 220])
            }
        })
    }

    /// Encodes a frame as PNG bytes.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails, which does not happen for in-memory buffers.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn png_bytes(frame: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(frame.clone())
            .write_to(&mut buf, ImageFormat::Png)
            .expect("PNG encoding into memory");
        buf.into_inner()
    }

    /// Encodes a frame as JPEG bytes.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails, which does not happen for in-memory buffers.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn jpeg_bytes(frame: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(frame.clone())
            .write_to(&mut buf, ImageFormat::Jpeg)
            .expect("JPEG encoding into memory");
        buf.into_inner()
    }

    /// Base64 of the PNG encoding, without a data-URL prefix.
    #[must_use]
    pub fn png_base64(frame: &RgbImage) -> String {
        base64::engine::general_purpose::STANDARD.encode(Self::png_bytes(frame))
    }

    /// Browser-style data URL of the JPEG encoding.
    #[must_use]
    pub fn jpeg_data_url(frame: &RgbImage) -> String {
        format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(Self::jpeg_bytes(frame))
        )
    }
}
