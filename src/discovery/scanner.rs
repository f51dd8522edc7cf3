//! File system scanner for discovering map layers.
//!
//! Recursively walks a map directory to find the `*gridless.jpg` image of
//! every directory that has one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{FgError, Result};

/// File name suffix (case-insensitive) of a layer image.
pub const GRIDLESS_SUFFIX: &str = "gridless.jpg";

/// A discovered layer image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSource {
    /// Directory holding the image.
    pub dir: PathBuf,
    /// File name of the image within `dir`.
    pub file_name: String,
}

impl LayerSource {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Check whether a file name is a layer image.
pub fn is_gridless(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(GRIDLESS_SUFFIX)
}

/// Find the layer images below `root`.
///
/// Within each directory, files are visited before subdirectories and
/// both in name order, so the image directly inside `root` always comes
/// first. A directory with two layer images is an error.
pub fn discover_layers(root: &Path) -> Result<Vec<LayerSource>> {
    let mut found: HashMap<PathBuf, String> = HashMap::new();
    let mut layers = Vec::new();

    if !root.exists() {
        return Ok(layers);
    }

    let walker = WalkDir::new(root).follow_links(true).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !is_gridless(&file_name) {
            continue;
        }

        let dir = entry
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());

        if let Some(existing) = found.get(&dir) {
            return Err(FgError::Conflict {
                message: format!(
                    "More than one gridless file found in directory {}. Conflicting files:\n{}\n{}",
                    dir.display(),
                    existing,
                    file_name
                ),
                help: Some("Keep a single *gridless.jpg image per directory".to_string()),
            });
        }

        found.insert(dir.clone(), file_name.clone());
        layers.push(LayerSource { dir, file_name });
    }

    Ok(layers)
}

/// Derive a layer name from a directory's path relative to the map root.
///
/// Path segments are joined with `" - "`; the map root itself has no name.
pub fn layer_name(root: &Path, dir: &Path) -> Option<String> {
    let relative = dir.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join(" - "))
    }
}
