//! Eyefit Core - Domain logic for eyeglass-fitting measurements
//!
//! This crate contains the domain types, the ports the detection backends plug
//! into, the pure measurement calculator, the single-shot and batch-averaging
//! pipelines, and request building and signing for the CAD parameter push.

pub mod cad;
pub mod domain;
pub mod measure;
pub mod ports;

pub use cad::{CadCredentials, CadError, CadTarget, LensParameters, SignedRequest};
pub use domain::{Circle, IrisBoundary, MeasureError, Measurement, PupilCenter, Rect, ScanSummary};
pub use measure::{
    run_scan, CenteringPolicy, EyeEstimates, MeasureConfig, Measurer, ScanConfig, ScanOutcome,
    KNOWN_DISTANCE_MM,
};
pub use ports::{
    CircleFinder, FaceEyeDetector, FrameMeasurer, FrameSource, HoughParams, ProgressSink,
    ScanEvent, SummaryOutput,
};
