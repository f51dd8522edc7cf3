//! The per-map occluder sidecar (`occluders.xml`).

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{FgError, Result};
use crate::xml::{read_file, render_document, Element};

pub const OCCLUDERS_FILENAME: &str = "occluders.xml";

/// Root element of the occluder sidecar.
pub const OCCLUDERS_ROOT: &str = "saved-occluders";

/// Read the occluder shapes saved next to a map.
///
/// A missing or malformed file yields no occluders.
pub fn load_occluders(path: &Path) -> Vec<Element> {
    if !path.exists() {
        debug!("No occluder file at {}", path.display());
        return Vec::new();
    }

    match read_file(path) {
        Ok(root) => root.elements().cloned().collect(),
        Err(e) => {
            warn!("Ignoring malformed occluder file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Write occluder shapes next to a map.
///
/// Nothing is written when there are no occluders; returns whether the
/// file was written.
pub fn save_occluders(path: &Path, occluders: &[Element]) -> Result<bool> {
    if occluders.is_empty() {
        debug!("No occluders to save at {}", path.display());
        return Ok(false);
    }

    let mut root = Element::new(OCCLUDERS_ROOT);
    for occluder in occluders {
        root.push(occluder.clone());
    }

    fs::write(path, render_document(&root))
        .map_err(|e| FgError::io(path, format!("Failed to write occluders: {}", e)))?;
    Ok(true)
}
