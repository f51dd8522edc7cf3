//! Process configuration for an ingest run.
//!
//! Values come from three places, highest priority first: command-line
//! flags, the map directory's `fgmap.yaml`, and built-in defaults. The
//! merged [`IngestConfig`] also supplies the runtime tier of default
//! resolution.

mod manifest;

use std::path::{Path, PathBuf};

use crate::error::{FgError, Result};
use crate::settings::{RuntimeDefaults, SettingKey, SettingValue};
use crate::types::Pair;

pub use manifest::{Manifest, MANIFEST_FILENAME};

pub const DEFAULT_GRID_SIZE: u32 = 100;

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub campaign: Option<String>,
    pub campaign_dir: Option<PathBuf>,
    pub grid_size: Option<u32>,
    pub grid_offset_x: Option<i64>,
    pub grid_offset_y: Option<i64>,
    pub brush_size: Option<f64>,
    pub overwrite_images: bool,
    pub overwrite_db: bool,
    pub disable_saving: bool,
    pub disallow_player_drawing: bool,
    pub disable_grid: bool,
    pub disable_grid_snap: bool,
}

/// Fully merged configuration of one ingest run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub map_dir: PathBuf,
    pub campaign: String,
    pub campaign_dir: Option<PathBuf>,
    pub grid_size: u32,
    pub grid_offset: (i64, i64),
    /// Always positive once merged.
    pub brush_size: f64,
    pub overwrite_images: bool,
    /// Ignore values stored in the existing database.
    pub overwrite_db: bool,
    pub disable_saving: bool,
    pub player_drawing: bool,
    pub grid: bool,
    pub grid_snap: bool,
}

impl IngestConfig {
    /// Merge command-line values over the map directory's manifest.
    pub fn load(map_dir: impl Into<PathBuf>, overrides: Overrides) -> Result<Self> {
        let map_dir = map_dir.into();
        if !map_dir.is_dir() {
            return Err(FgError::configuration(
                format!("Map directory {} does not exist", map_dir.display()),
                None,
            ));
        }

        let manifest = Manifest::find(&map_dir)?.unwrap_or_default();
        Self::merge(map_dir, overrides, manifest)
    }

    /// Merge without touching the filesystem.
    pub fn merge(map_dir: PathBuf, cli: Overrides, manifest: Manifest) -> Result<Self> {
        let campaign = match cli.campaign.or(manifest.campaign) {
            Some(campaign) => campaign,
            None => default_campaign(&map_dir)?,
        };

        let grid_size = cli.grid_size.or(manifest.grid_size).unwrap_or(DEFAULT_GRID_SIZE);
        let [manifest_x, manifest_y] = manifest.grid_offset.unwrap_or_default();
        let grid_offset = (
            cli.grid_offset_x.unwrap_or(manifest_x),
            cli.grid_offset_y.unwrap_or(manifest_y),
        );

        let brush_size = match cli.brush_size.or(manifest.brush_size).unwrap_or(0.0) {
            size if size < 0.0 => {
                return Err(FgError::configuration(
                    format!("Brush size must not be negative, got {}", size),
                    None,
                ))
            }
            size if size == 0.0 => f64::from(grid_size) * 0.1,
            size => size,
        };

        let overwrite_db = cli.overwrite_db || manifest.overwrite_db.unwrap_or(false);

        Ok(Self {
            map_dir,
            campaign,
            campaign_dir: cli.campaign_dir.or(manifest.campaign_dir),
            grid_size,
            grid_offset,
            brush_size,
            overwrite_images: cli.overwrite_images || manifest.overwrite_images.unwrap_or(false),
            overwrite_db,
            disable_saving: overwrite_db
                || cli.disable_saving
                || manifest.disable_saving.unwrap_or(false),
            player_drawing: !cli.disallow_player_drawing && manifest.player_drawing.unwrap_or(true),
            grid: !cli.disable_grid && manifest.grid.unwrap_or(true),
            grid_snap: !cli.disable_grid_snap && manifest.grid_snap.unwrap_or(true),
        })
    }

    /// Whether values in the existing database are kept.
    pub fn respect_db(&self) -> bool {
        !self.overwrite_db
    }

    /// The runtime tier of default resolution.
    pub fn runtime_defaults(&self) -> RuntimeDefaults {
        let grid_size = i64::from(self.grid_size);
        RuntimeDefaults::new()
            .with(SettingKey::PlayerDrawing, SettingValue::Flag(self.player_drawing))
            .with(SettingKey::Grid, SettingValue::Flag(self.grid))
            .with(SettingKey::GridSize, SettingValue::Pair(Pair::int(grid_size, grid_size)))
            .with(
                SettingKey::GridOffset,
                SettingValue::Pair(Pair::int(self.grid_offset.0, self.grid_offset.1)),
            )
            .with(SettingKey::GridSnap, SettingValue::Flag(self.grid_snap))
            .with(
                SettingKey::BrushSize,
                SettingValue::Pair(Pair::float(self.brush_size, self.brush_size)),
            )
    }
}

fn default_campaign(map_dir: &Path) -> Result<String> {
    let absolute = if map_dir.is_absolute() {
        map_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(map_dir)
    };

    // Canonicalize so "." and "maps/.." still name a directory.
    absolute
        .canonicalize()
        .unwrap_or(absolute)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            FgError::configuration(
                format!("Cannot derive a campaign name from {}", map_dir.display()),
                Some("Pass --campaign or set campaign in fgmap.yaml"),
            )
        })
}
