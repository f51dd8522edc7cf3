//! Map layers.

use std::path::{Path, PathBuf};

use crate::xml::Element;

/// One visual slice of a map: a raster image or an occluder overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Position in creation order, unique within the map.
    pub id: u32,

    /// Display name; absent for the map's top-level image and for occluder layers.
    pub name: Option<String>,

    /// Source image on disk.
    pub source_file: Option<PathBuf>,

    /// Opaque occluder shape data.
    pub occluder: Option<Element>,
}

impl Layer {
    /// An image layer backed by a source file.
    pub fn image(id: u32, name: Option<String>, source_file: impl Into<PathBuf>) -> Self {
        Self {
            id,
            name,
            source_file: Some(source_file.into()),
            occluder: None,
        }
    }

    /// An occluder-only layer.
    pub fn occluder(id: u32, occluder: Element) -> Self {
        Self {
            id,
            name: None,
            source_file: None,
            occluder: Some(occluder),
        }
    }

    /// Name as used in file names, empty when the layer has none.
    pub fn file_stem(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Extension of the source file including the dot (`.jpg`), or empty.
    pub fn extension(&self) -> String {
        self.source_file
            .as_deref()
            .and_then(Path::extension)
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Bitmap reference embedded in `db.xml`.
    pub fn embed_path(&self, map_name: &str) -> Option<String> {
        self.source_file.as_ref()?;
        Some(format!(
            "campaign/images/{}/{}{}",
            map_name,
            self.file_stem(),
            self.extension()
        ))
    }

    /// Where the source image is copied to inside a map's campaign image directory.
    pub fn destination_path(&self, map_image_dir: &Path) -> Option<PathBuf> {
        self.source_file.as_ref()?;
        Some(map_image_dir.join(format!("{}{}", self.file_stem(), self.extension())))
    }
}
