//! Map and layer discovery.
//!
//! Every immediate subdirectory of the root map directory is one map,
//! named after the directory. Inside a map directory, each directory that
//! holds a `*gridless.jpg` image contributes one layer.
//!
//! # Example
//!
//! ```ignore
//! use fgmap::discovery::{map_directories, discover_layers};
//!
//! for (name, dir) in map_directories("./maps")? {
//!     println!("{}: {} layer(s)", name, discover_layers(&dir)?.len());
//! }
//! ```

mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FgError, Result};

pub use scanner::{discover_layers, is_gridless, layer_name, LayerSource, GRIDLESS_SUFFIX};

/// List the map directories below `root` as `(name, path)`, sorted by name.
///
/// Hidden directories are skipped.
pub fn map_directories(root: impl AsRef<Path>) -> Result<Vec<(String, PathBuf)>> {
    let root = root.as_ref();
    let entries = fs::read_dir(root)
        .map_err(|e| FgError::io(root, format!("Failed to read map directory: {}", e)))?;

    let mut maps = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FgError::io(root, format!("Failed to read entry: {}", e)))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        maps.push((name, path));
    }

    maps.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(maps)
}
