//! Frame source port for camera or replayed frames.

use image::RgbImage;

/// Port for acquiring frames one at a time.
pub trait FrameSource {
    /// Acquires the next frame.
    ///
    /// Returns `Ok(None)` when the stream has ended or the user asked to quit.
    ///
    /// # Errors
    ///
    /// A read failure for this frame. Callers treat it as transient and ask
    /// again.
    fn next_frame(&mut self) -> anyhow::Result<Option<RgbImage>>;
}
