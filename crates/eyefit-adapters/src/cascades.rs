//! Haar cascade file lookup and downloading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// A pretrained cascade the detector needs.
#[derive(Debug, Clone)]
pub struct CascadeFile {
    /// Short name.
    pub name: &'static str,
    /// File name on disk.
    pub filename: &'static str,
    /// Download URL.
    pub url: &'static str,
}

/// Frontal face cascade.
pub const FACE_CASCADE: CascadeFile = CascadeFile {
    name: "face",
    filename: "haarcascade_frontalface_default.xml",
    url: "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades/haarcascade_frontalface_default.xml",
};

/// Eye cascade.
pub const EYE_CASCADE: CascadeFile = CascadeFile {
    name: "eye",
    filename: "haarcascade_eye.xml",
    url: "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades/haarcascade_eye.xml",
};

/// Cascades required by the detector.
pub const CASCADES: &[CascadeFile] = &[FACE_CASCADE, EYE_CASCADE];

/// Directories where OpenCV packages usually install their cascades.
const SYSTEM_DIRS: &[&str] = &[
    "/usr/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/opt/homebrew/share/opencv4/haarcascades",
];

/// Resolved cascade file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePaths {
    /// Face cascade XML.
    pub face: PathBuf,
    /// Eye cascade XML.
    pub eye: PathBuf,
}

/// Returns the cascades data directory.
///
/// Uses `XDG_DATA_HOME/eyefit/cascades` or `~/.local/share/eyefit/cascades`.
#[must_use]
pub fn cascades_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eyefit")
        .join("cascades")
}

/// Directories searched for cascade files, in priority order.
#[must_use]
pub fn search_dirs(configured: Option<&Path>) -> Vec<PathBuf> {
    configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(std::iter::once(cascades_dir()))
        .chain(SYSTEM_DIRS.iter().map(PathBuf::from))
        .collect()
}

/// Finds one cascade file in `dirs`, unless an explicit file is given.
fn locate_one(file: &CascadeFile, explicit: Option<&Path>, dirs: &[PathBuf]) -> Result<PathBuf> {
    if let Some(path) = explicit {
        anyhow::ensure!(
            path.is_file(),
            "{} cascade not found at {}",
            file.name,
            path.display()
        );
        return Ok(path.to_path_buf());
    }

    dirs.iter()
        .map(|dir| dir.join(file.filename))
        .find(|candidate| candidate.is_file())
        .with_context(|| {
            format!(
                "{} cascade ({}) not found; run `eyefit cascades fetch` or set cascades.dir",
                file.name, file.filename
            )
        })
}

/// Resolves both cascade files.
///
/// Explicit `face` / `eye` paths win; otherwise the configured directory,
/// the data directory and the system OpenCV directories are searched in
/// that order.
///
/// # Errors
///
/// Returns an error if either cascade cannot be found.
pub fn locate_cascades(
    configured_dir: Option<&Path>,
    face: Option<&Path>,
    eye: Option<&Path>,
) -> Result<CascadePaths> {
    let dirs = search_dirs(configured_dir);
    let paths = CascadePaths {
        face: locate_one(&FACE_CASCADE, face, &dirs)?,
        eye: locate_one(&EYE_CASCADE, eye, &dirs)?,
    };
    debug!("Using cascades {:?}", paths);
    Ok(paths)
}

/// Lists each cascade with the path it resolves to, if any.
#[must_use]
pub fn list_cascades(configured_dir: Option<&Path>) -> Vec<(&'static str, Option<PathBuf>)> {
    let dirs = search_dirs(configured_dir);
    CASCADES
        .iter()
        .map(|c| (c.filename, locate_one(c, None, &dirs).ok()))
        .collect()
}

/// A cascade present in the target directory after a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedCascade {
    /// File name.
    pub filename: &'static str,
    /// Location on disk.
    pub path: PathBuf,
    /// Hex SHA-256 of the file.
    pub sha256: String,
    /// Whether it was downloaded by this call.
    pub downloaded: bool,
}

/// Ensures every cascade exists in `dir`, downloading missing ones.
///
/// With `force`, existing files are downloaded again.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - A download fails
/// - A file cannot be read or written
pub fn fetch_cascades(dir: &Path, force: bool) -> Result<Vec<FetchedCascade>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create cascades directory {}", dir.display()))?;

    CASCADES
        .iter()
        .map(|cascade| {
            let path = dir.join(cascade.filename);
            let downloaded = if path.exists() && !force {
                debug!("Cascade {} already exists", cascade.filename);
                false
            } else {
                download_cascade(cascade, &path)?;
                true
            };

            let sha256 = file_sha256(&path)?;
            info!("{}: sha256 {}", cascade.filename, sha256);
            Ok(FetchedCascade {
                filename: cascade.filename,
                path,
                sha256,
                downloaded,
            })
        })
        .collect()
}

/// Downloads a cascade from its URL.
fn download_cascade(cascade: &CascadeFile, path: &Path) -> Result<()> {
    info!("Downloading cascade: {}", cascade.filename);

    let response = reqwest::blocking::get(cascade.url)
        .with_context(|| format!("Failed to download {}", cascade.filename))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status: {}", response.status());
    }

    let bytes = response
        .bytes()
        .with_context(|| format!("Failed to read response for {}", cascade.filename))?;

    fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Downloaded {} ({} bytes)", cascade.filename, bytes.len());
    Ok(())
}

/// Hex SHA-256 of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
