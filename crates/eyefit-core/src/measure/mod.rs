//! Measurement pipeline.
//!
//! - [`calculator`]: pure pixel-to-millimeter arithmetic
//! - [`luma`]: BT.601 grayscale conversion
//! - [`placement`]: the "centered and large enough" face policy
//! - [`eye_features`]: iris and pupil estimation from eye crops
//! - [`Measurer`]: one frame in, one measurement or one failure out
//! - [`run_scan`]: batch averaging over a frame stream

pub mod calculator;
mod config;
pub mod eye_features;
pub mod luma;
pub mod placement;
mod pipeline;
mod scan;

pub use calculator::{compute_measurement, pixel_to_mm_ratio, EyeEstimates, KNOWN_DISTANCE_MM};
pub use config::MeasureConfig;
pub use luma::to_gray;
pub use pipeline::Measurer;
pub use placement::CenteringPolicy;
pub use scan::{run_scan, ScanConfig, ScanOutcome};
