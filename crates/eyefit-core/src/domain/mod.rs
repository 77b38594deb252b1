//! Core domain types for eyeglass-fitting measurements.

mod error;
mod geometry;
mod measurement;

pub use error::MeasureError;
pub use geometry::{Circle, IrisBoundary, PupilCenter, Rect};
pub use measurement::{round2, Measurement, ScanSummary};
