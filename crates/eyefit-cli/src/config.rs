//! Configuration file support for eyefit.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/eyefit/config.toml` (lowest priority)
//! - Project-local: `.eyefit.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Measurement calculator and face placement settings.
    pub measure: MeasureSection,
    /// Batch scan settings.
    pub scan: ScanSection,
    /// HTTP service settings.
    pub server: ServerSection,
    /// Haar cascade locations.
    pub cascades: CascadesSection,
    /// CAD push settings.
    pub cad: CadSection,
}

/// Measurement configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MeasureSection {
    /// Interpupillary calibration distance in millimeters.
    pub known_distance_mm: Option<f64>,
    /// Allowed face-center offset as a fraction of the frame (0.0-1.0).
    pub center_tolerance: Option<f64>,
    /// Minimum face height as a fraction of the frame height (0.0-1.0).
    pub min_face_height_ratio: Option<f64>,
    /// Fail instead of using a unit scale when the eyes overlap.
    pub reject_degenerate_scale: Option<bool>,
}

/// Batch scan configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Camera device index.
    pub camera_index: Option<i32>,
    /// Measurements per batch.
    pub frames_per_batch: Option<usize>,
    /// Number of batches.
    pub batches: Option<usize>,
    /// Consecutive face-less frames before a partial batch is discarded.
    pub lost_frame_threshold: Option<usize>,
    /// CSV output file.
    pub output: Option<PathBuf>,
    /// Seconds to count down before measuring.
    pub countdown_secs: Option<u32>,
    /// Flip frames horizontally.
    pub mirror: Option<bool>,
    /// Show a preview window.
    pub preview: Option<bool>,
}

/// HTTP service configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Listen address, e.g. `127.0.0.1:5000`.
    pub bind: Option<String>,
    /// Maximum request body size in bytes.
    pub max_body_bytes: Option<usize>,
}

/// Cascade file configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CascadesSection {
    /// Directory searched first for cascade files.
    pub dir: Option<PathBuf>,
    /// Explicit face cascade file.
    pub face: Option<PathBuf>,
    /// Explicit eye cascade file.
    pub eye: Option<PathBuf>,
}

/// CAD push configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CadSection {
    /// API host.
    pub base_url: Option<String>,
    /// Document ID.
    pub document_id: Option<String>,
    /// Workspace ID.
    pub workspace_id: Option<String>,
    /// Element ID.
    pub element_id: Option<String>,
    /// Access key.
    pub access_key: Option<String>,
    /// Secret key.
    pub secret_key: Option<String>,
    /// Millimeters added to the measured bridge.
    pub offset_mm: Option<f64>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/eyefit/config.toml`
    /// 2. Project-local: `.eyefit.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(d) = self.measure.known_distance_mm {
            if d <= 0.0 {
                return Err(format!("measure.known_distance_mm must be positive, got {d}"));
            }
        }
        if let Some(t) = self.measure.center_tolerance {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!("measure.center_tolerance must be 0.0-1.0, got {t}"));
            }
        }
        if let Some(r) = self.measure.min_face_height_ratio {
            if !(0.0..=1.0).contains(&r) {
                return Err(format!(
                    "measure.min_face_height_ratio must be 0.0-1.0, got {r}"
                ));
            }
        }

        if self.scan.frames_per_batch == Some(0) {
            return Err("scan.frames_per_batch must be at least 1".to_string());
        }
        if self.scan.batches == Some(0) {
            return Err("scan.batches must be at least 1".to_string());
        }
        if self.scan.lost_frame_threshold == Some(0) {
            return Err("scan.lost_frame_threshold must be at least 1".to_string());
        }
        if let Some(i) = self.scan.camera_index {
            if i < 0 {
                return Err(format!("scan.camera_index must not be negative, got {i}"));
            }
        }

        if let Some(ref bind) = self.server.bind {
            if bind.parse::<std::net::SocketAddr>().is_err() {
                return Err(format!(
                    "server.bind must be an address like 127.0.0.1:5000, got '{bind}'"
                ));
            }
        }
        if self.server.max_body_bytes == Some(0) {
            return Err("server.max_body_bytes must be at least 1".to_string());
        }

        if let Some(ref url) = self.cad.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("cad.base_url must be an http(s) URL, got '{url}'"));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Measure
        self.measure.known_distance_mm = other
            .measure
            .known_distance_mm
            .or(self.measure.known_distance_mm);
        self.measure.center_tolerance = other
            .measure
            .center_tolerance
            .or(self.measure.center_tolerance);
        self.measure.min_face_height_ratio = other
            .measure
            .min_face_height_ratio
            .or(self.measure.min_face_height_ratio);
        self.measure.reject_degenerate_scale = other
            .measure
            .reject_degenerate_scale
            .or(self.measure.reject_degenerate_scale);

        // Scan
        self.scan.camera_index = other.scan.camera_index.or(self.scan.camera_index);
        self.scan.frames_per_batch = other.scan.frames_per_batch.or(self.scan.frames_per_batch);
        self.scan.batches = other.scan.batches.or(self.scan.batches);
        self.scan.lost_frame_threshold = other
            .scan
            .lost_frame_threshold
            .or(self.scan.lost_frame_threshold);
        self.scan.output = other.scan.output.or_else(|| self.scan.output.take());
        self.scan.countdown_secs = other.scan.countdown_secs.or(self.scan.countdown_secs);
        self.scan.mirror = other.scan.mirror.or(self.scan.mirror);
        self.scan.preview = other.scan.preview.or(self.scan.preview);

        // Server
        self.server.bind = other.server.bind.or_else(|| self.server.bind.take());
        self.server.max_body_bytes = other.server.max_body_bytes.or(self.server.max_body_bytes);

        // Cascades
        self.cascades.dir = other.cascades.dir.or_else(|| self.cascades.dir.take());
        self.cascades.face = other.cascades.face.or_else(|| self.cascades.face.take());
        self.cascades.eye = other.cascades.eye.or_else(|| self.cascades.eye.take());

        // CAD
        self.cad.base_url = other.cad.base_url.or_else(|| self.cad.base_url.take());
        self.cad.document_id = other.cad.document_id.or_else(|| self.cad.document_id.take());
        self.cad.workspace_id = other
            .cad
            .workspace_id
            .or_else(|| self.cad.workspace_id.take());
        self.cad.element_id = other.cad.element_id.or_else(|| self.cad.element_id.take());
        self.cad.access_key = other.cad.access_key.or_else(|| self.cad.access_key.take());
        self.cad.secret_key = other.cad.secret_key.or_else(|| self.cad.secret_key.take());
        self.cad.offset_mm = other.cad.offset_mm.or(self.cad.offset_mm);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("eyefit").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.eyefit.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".eyefit.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
