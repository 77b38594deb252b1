//! Single-frame measurement port.

use image::RgbImage;

use crate::domain::{MeasureError, Measurement};

/// Turns one frame into one measurement or one failure reason.
///
/// Implemented by [`Measurer`](crate::measure::Measurer); the HTTP service and
/// the batch scanner depend only on this trait.
pub trait FrameMeasurer: Send {
    /// Measures a single frame.
    ///
    /// # Errors
    ///
    /// Returns the reason no measurement could be produced.
    fn measure(&mut self, frame: &RgbImage) -> Result<Measurement, MeasureError>;
}
