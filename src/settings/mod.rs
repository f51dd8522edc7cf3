//! Per-map and campaign-wide settings documents (`settings.json`).
//!
//! Both documents share one shape. A map's sidecar is the per-entity tier
//! of default resolution and is rewritten at the end of a run with the
//! map's final values; the campaign document is the middle tier and is
//! only ever read.

mod resolver;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FgError, Result};
use crate::types::Pair;

pub use resolver::{DefaultResolver, RuntimeDefaults, SettingKey, SettingValue};

/// The name of both the per-map sidecar and the campaign defaults file.
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Settings stored in a `settings.json` document.
///
/// Every key is optional; absent keys fall through to the next tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub map_id: Option<u32>,
    pub name: Option<String>,
    pub parent_map: Option<String>,
    pub player_drawing: Option<bool>,
    pub grid: Option<bool>,
    pub grid_size: Option<Pair>,
    pub grid_offset: Option<Pair>,
    pub grid_snap: Option<bool>,
    pub brush_size: Option<Pair>,
}

impl MapSettings {
    /// Parse settings from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| FgError::Configuration {
            message: format!("Invalid settings document: {}", e),
            help: None,
        })
    }

    /// Read a settings document, treating a missing or malformed file as empty.
    pub fn load_or_default(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                debug!("No settings found at {}", path.display());
                return Self::default();
            }
        };

        match Self::parse(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring malformed settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the settings as pretty-printed JSON with four-space indentation.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer).map_err(|e| {
            FgError::io(path, format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, buffer)
            .map_err(|e| FgError::io(path, format!("Failed to write settings: {}", e)))
    }

    /// The sidecar value for a resolvable key, if present and truthy.
    ///
    /// A `false` flag counts as unset, so it falls through to the next tier.
    pub fn get(&self, key: SettingKey) -> Option<SettingValue> {
        let value = match key {
            SettingKey::PlayerDrawing => self.player_drawing.map(SettingValue::Flag),
            SettingKey::Grid => self.grid.map(SettingValue::Flag),
            SettingKey::GridSnap => self.grid_snap.map(SettingValue::Flag),
            SettingKey::GridSize => self.grid_size.map(SettingValue::Pair),
            SettingKey::GridOffset => self.grid_offset.map(SettingValue::Pair),
            SettingKey::BrushSize => self.brush_size.map(SettingValue::Pair),
        };
        value.filter(SettingValue::is_truthy)
    }

    /// The sidecar map id; zero is treated as unassigned.
    pub fn map_id(&self) -> Option<u32> {
        self.map_id.filter(|id| *id > 0)
    }

    /// The parent map name; an empty string is treated as no parent.
    pub fn parent_map(&self) -> Option<&str> {
        self.parent_map.as_deref().filter(|name| !name.is_empty())
    }
}
