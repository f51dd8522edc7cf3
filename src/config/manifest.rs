//! Project manifest (fgmap.yaml) parsing.
//!
//! The manifest sits in the root map directory and pins the campaign and
//! the runtime defaults for every ingest of that directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FgError, Result};

pub const MANIFEST_FILENAME: &str = "fgmap.yaml";

/// Project manifest loaded from fgmap.yaml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Campaign name, looked up in the Fantasy Grounds data directory.
    pub campaign: Option<String>,

    /// Campaign directory; skips the lookup by name.
    pub campaign_dir: Option<PathBuf>,

    pub grid_size: Option<u32>,

    /// Grid offset as `[x, y]`.
    pub grid_offset: Option<[i64; 2]>,

    /// Brush size; 0 means a tenth of the grid size.
    pub brush_size: Option<f64>,

    pub overwrite_images: Option<bool>,
    pub overwrite_db: Option<bool>,
    pub disable_saving: Option<bool>,

    pub player_drawing: Option<bool>,
    pub grid: Option<bool>,
    pub grid_snap: Option<bool>,
}

impl Manifest {
    /// Load the manifest of a map directory, if it has one.
    pub fn find(map_dir: &Path) -> Result<Option<Self>> {
        let path = map_dir.join(MANIFEST_FILENAME);
        if !path.is_file() {
            debug!("No manifest at {}", path.display());
            return Ok(None);
        }

        let mut manifest = Self::load(&path)?;
        // Relative campaign directories are relative to the manifest.
        if let Some(dir) = manifest.campaign_dir.take() {
            manifest.campaign_dir = Some(if dir.is_relative() { map_dir.join(dir) } else { dir });
        }
        Ok(Some(manifest))
    }

    /// Load manifest from a fgmap.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FgError::io(path, format!("Failed to read manifest: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| {
            FgError::configuration(
                format!("Invalid manifest: {}", e),
                Some("Check fgmap.yaml syntax"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
campaign: Lost Mine
grid_size: 140
grid_offset: [5, -3]
brush_size: 12.5
overwrite_images: true
grid_snap: false
"#;
        let manifest = Manifest::parse(yaml).unwrap();

        assert_eq!(manifest.campaign.as_deref(), Some("Lost Mine"));
        assert_eq!(manifest.grid_size, Some(140));
        assert_eq!(manifest.grid_offset, Some([5, -3]));
        assert_eq!(manifest.brush_size, Some(12.5));
        assert_eq!(manifest.overwrite_images, Some(true));
        assert_eq!(manifest.grid_snap, Some(false));
        assert_eq!(manifest.overwrite_db, None);
    }

    #[test]
    fn test_parse_empty_manifest() {
        assert_eq!(Manifest::parse("").unwrap(), Manifest::default());
    }

    #[test]
    fn test_parse_invalid_manifest() {
        let err = Manifest::parse("grid_size: huge").unwrap_err();
        assert!(matches!(err, FgError::Configuration { .. }));

        assert!(Manifest::parse("gird_size: 100").is_err());
    }

    #[test]
    fn test_find_missing() {
        let dir = tempdir().unwrap();
        assert_eq!(Manifest::find(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_find_resolves_relative_campaign_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILENAME), "campaign_dir: ../campaign\n").unwrap();

        let manifest = Manifest::find(dir.path()).unwrap().unwrap();
        assert_eq!(manifest.campaign_dir, Some(dir.path().join("../campaign")));
    }
}
