//! Filesystem adapter replaying image files as a frame stream.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eyefit_core::FrameSource;
use image::RgbImage;
use tracing::{debug, warn};

/// Supported image extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Frame source yielding image files in name order.
///
/// A directory contributes its supported files sorted by file name; files
/// given directly are kept in argument order.
pub struct FsFrameSource {
    files: VecDeque<PathBuf>,
    mirror: bool,
}

impl FsFrameSource {
    /// Creates a frame source from files and directories.
    #[must_use]
    pub fn new(paths: &[PathBuf]) -> Self {
        let files = collect_files(paths);
        debug!("Found {} frame files", files.len());
        Self {
            files: files.into(),
            mirror: false,
        }
    }

    /// Flips every frame horizontally, as a selfie camera would.
    #[must_use]
    pub const fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Number of frames left to replay.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.files.len()
    }
}

impl FrameSource for FsFrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.files.pop_front() else {
            return Ok(None);
        };

        let mut frame = load_frame(&path)?;
        if self.mirror {
            image::imageops::flip_horizontal_in_place(&mut frame);
        }
        Ok(Some(frame))
    }
}

/// Loads one image file as an RGB frame.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_frame(path: &Path) -> Result<RgbImage> {
    let image =
        image::open(path).with_context(|| format!("Failed to open image: {}", path.display()))?;
    Ok(image.to_rgb8())
}

fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                files.push(path.clone());
            } else {
                warn!("Unsupported file type: {}", path.display());
            }
        } else if path.is_dir() {
            let mut entries = match std::fs::read_dir(path) {
                Ok(entries) => entries
                    .flatten()
                    .map(|e| e.path())
                    .filter(|p| p.is_file() && is_supported_image(p))
                    .collect::<Vec<_>>(),
                Err(e) => {
                    warn!("Failed to read directory {}: {e}", path.display());
                    continue;
                }
            };
            entries.sort();
            files.extend(entries);
        } else {
            warn!("Path does not exist: {}", path.display());
        }
    }

    files
}

/// Checks if a path has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}
