//! Measurement options shared by `scan`, `measure` and `serve`.

use std::path::PathBuf;

use clap::Args;
use eyefit_core::MeasureConfig;

use super::{parse_fraction, parse_positive_mm};
use crate::config::{AppConfig, CascadesSection};

/// Calculator, placement and cascade options.
#[derive(Args, Clone, Debug, Default)]
pub struct MeasureOptions {
    /// Interpupillary calibration distance in millimeters
    #[arg(long, value_parser = parse_positive_mm, value_name = "MM")]
    pub known_distance: Option<f64>,

    /// Allowed face-center offset as a fraction of the frame (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub center_tolerance: Option<f64>,

    /// Minimum face height as a fraction of the frame height (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub min_face_height: Option<f64>,

    /// Fail instead of using a unit scale when the eyes overlap
    #[arg(long)]
    pub reject_degenerate_scale: bool,

    /// Directory searched first for cascade files
    #[arg(long, value_name = "DIR")]
    pub cascades_dir: Option<PathBuf>,
}

impl MeasureOptions {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        let measure = &config.measure;
        self.known_distance = self.known_distance.or(measure.known_distance_mm);
        self.center_tolerance = self.center_tolerance.or(measure.center_tolerance);
        self.min_face_height = self.min_face_height.or(measure.min_face_height_ratio);
        if !self.reject_degenerate_scale {
            self.reject_degenerate_scale = measure.reject_degenerate_scale.unwrap_or(false);
        }
        if self.cascades_dir.is_none() {
            self.cascades_dir.clone_from(&config.cascades.dir);
        }
        self
    }

    /// The calculator configuration, with hardcoded defaults for unset values.
    #[must_use]
    pub fn measure_config(&self) -> MeasureConfig {
        let defaults = MeasureConfig::default();
        MeasureConfig {
            known_distance_mm: self.known_distance.unwrap_or(defaults.known_distance_mm),
            center_tolerance: self.center_tolerance.unwrap_or(defaults.center_tolerance),
            min_face_height_ratio: self
                .min_face_height
                .unwrap_or(defaults.min_face_height_ratio),
            reject_degenerate_scale: self.reject_degenerate_scale,
        }
    }

    /// Cascade locations: the CLI directory replaces the configured one.
    #[must_use]
    pub fn cascades(&self, config: &AppConfig) -> CascadesSection {
        CascadesSection {
            dir: self.cascades_dir.clone(),
            ..config.cascades.clone()
        }
    }
}
