//! Copying layer images into the campaign.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{FgError, Result};
use crate::types::MapEntity;

/// Outcome of copying one map's images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: usize,
    pub skipped: usize,
}

/// Copy every image layer of a map to `<campaign>/images/<map dir>/`.
///
/// Existing files are left alone unless `overwrite` is set.
pub fn copy_images(map: &MapEntity, campaign_dir: &Path, overwrite: bool) -> Result<CopyStats> {
    let image_dir = map.campaign_image_dir(campaign_dir);
    fs::create_dir_all(&image_dir)
        .map_err(|e| FgError::io(&image_dir, format!("Failed to create image directory: {}", e)))?;

    let mut stats = CopyStats::default();
    for layer in map.image_layers() {
        let (Some(source), Some(destination)) =
            (layer.source_file.as_deref(), layer.destination_path(&image_dir))
        else {
            continue;
        };

        if destination.exists() && !overwrite {
            debug!("Keeping existing {}", destination.display());
            stats.skipped += 1;
            continue;
        }

        debug!("Copying {} to {}", source.display(), destination.display());
        fs::copy(source, &destination)
            .map_err(|e| FgError::io(source, format!("Failed to copy image: {}", e)))?;
        stats.copied += 1;
    }

    Ok(stats)
}
