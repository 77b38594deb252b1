//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the measurement core and the
//! detection backends, frame sources and outputs.

mod circles;
mod detector;
mod frame_source;
mod measurer;
mod progress;
mod summary_output;

pub use circles::{CircleFinder, HoughParams};
pub use detector::FaceEyeDetector;
pub use frame_source::FrameSource;
pub use measurer::FrameMeasurer;
pub use progress::{ProgressSink, ScanEvent};
pub use summary_output::SummaryOutput;
