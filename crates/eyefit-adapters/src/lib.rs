//! Eyefit Adapters - External adapters for eyefit.
//!
//! This crate provides adapters for:
//! - Base64 / data-URL image payload decoding
//! - Filesystem frame replay
//! - CSV summary output
//! - Haar cascade file lookup and downloading
//! - The CAD variable-update client
//! - The OpenCV detection backend and camera (feature `opencv`)

pub mod cad;
pub mod cascades;
pub mod csv;
#[cfg(feature = "opencv")]
pub mod cv;
pub mod fs;
pub mod payload;

pub use cad::CadClient;
pub use cascades::{
    cascades_dir, fetch_cascades, list_cascades, locate_cascades, CascadePaths, FetchedCascade,
};
pub use csv::CsvSummaryOutput;
pub use fs::FsFrameSource;
pub use payload::{decode_image_payload, PayloadError};
