//! Test support utilities for eyefit.
//!
//! Provides scripted detection backends, frame sources, sinks and synthetic
//! frame builders for exercising the measurement pipeline without a camera
//! or a computer-vision library.
//!
//! # Example
//!
//! ```
//! use eyefit_core::{MeasureConfig, Measurer, Rect};
//! use eyefit_test_support::{ScriptedCircleFinder, ScriptedDetector, SyntheticFrameBuilder};
//!
//! let detector = ScriptedDetector::new()
//!     .with_faces(vec![Rect::new(220, 140, 200, 200)])
//!     .with_eyes(vec![Rect::new(10, 10, 30, 30), Rect::new(80, 12, 28, 28)]);
//! let mut measurer = Measurer::new(detector, ScriptedCircleFinder::none(), MeasureConfig::default());
//!
//! let frame = SyntheticFrameBuilder::blank(640, 480);
//! let measurement = measurer.measure_frame(&frame).unwrap();
//! assert!((measurement.bridge_width_mm - 36.52).abs() < 1e-9);
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticFrameBuilder;
pub use mocks::{
    MockFrameSource, MockProgressSink, MockSummaryOutput, ScriptedCircleFinder, ScriptedDetector,
};
