//! Three-tier default resolution.
//!
//! Priority, first present wins:
//!
//! 1. the map's own sidecar (`<map>/settings.json`)
//! 2. the campaign defaults (`<campaign>/settings.json`)
//! 3. the runtime defaults built from process configuration
//!
//! The runtime tier must hold every key. A gap there is a setup defect,
//! not something a user can fix by editing sidecars.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{FgError, Result};
use crate::types::Pair;

use super::MapSettings;

/// A map attribute that goes through default resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    PlayerDrawing,
    Grid,
    GridSize,
    GridOffset,
    GridSnap,
    BrushSize,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        SettingKey::PlayerDrawing,
        SettingKey::Grid,
        SettingKey::GridSize,
        SettingKey::GridOffset,
        SettingKey::GridSnap,
        SettingKey::BrushSize,
    ];

    /// Key name as written in `settings.json`.
    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::PlayerDrawing => "player_drawing",
            SettingKey::Grid => "grid",
            SettingKey::GridSize => "grid_size",
            SettingKey::GridOffset => "grid_offset",
            SettingKey::GridSnap => "grid_snap",
            SettingKey::BrushSize => "brush_size",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved setting value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingValue {
    Flag(bool),
    Pair(Pair),
}

impl SettingValue {
    /// Whether the value counts as set when it appears in an override tier.
    pub fn is_truthy(&self) -> bool {
        match self {
            SettingValue::Flag(value) => *value,
            SettingValue::Pair(_) => true,
        }
    }
}

/// The lowest-priority tier, supplied by process configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeDefaults {
    values: BTreeMap<SettingKey, SettingValue>,
}

impl RuntimeDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a default value.
    pub fn with(mut self, key: SettingKey, value: SettingValue) -> Self {
        self.values.insert(key, value);
        self
    }

    /// Remove a default value.
    pub fn remove(&mut self, key: SettingKey) -> Option<SettingValue> {
        self.values.remove(&key)
    }

    pub fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.values.get(&key).copied()
    }

    /// Keys with no runtime default.
    pub fn missing_keys(&self) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|key| !self.values.contains_key(key))
            .collect()
    }
}

/// Resolves map attributes against campaign and runtime defaults.
#[derive(Debug, Clone, Default)]
pub struct DefaultResolver {
    campaign: MapSettings,
    runtime: RuntimeDefaults,
}

impl DefaultResolver {
    pub fn new(campaign: MapSettings, runtime: RuntimeDefaults) -> Self {
        Self { campaign, runtime }
    }

    pub fn campaign(&self) -> &MapSettings {
        &self.campaign
    }

    pub fn runtime(&self) -> &RuntimeDefaults {
        &self.runtime
    }

    /// Resolve a key for a map whose sidecar holds `overrides`.
    pub fn resolve(&self, key: SettingKey, overrides: &MapSettings) -> Result<SettingValue> {
        if let Some(value) = overrides.get(key) {
            debug!("{} resolved from map sidecar", key);
            return Ok(value);
        }

        if let Some(value) = self.campaign.get(key) {
            debug!("{} resolved from campaign defaults", key);
            return Ok(value);
        }

        self.runtime.get(key).ok_or_else(|| {
            FgError::configuration(
                format!("No runtime default for '{}'", key),
                Some("Every map setting needs a runtime default; this is a setup defect"),
            )
        })
    }

    /// Resolve a flag setting.
    pub fn resolve_flag(&self, key: SettingKey, overrides: &MapSettings) -> Result<bool> {
        match self.resolve(key, overrides)? {
            SettingValue::Flag(value) => Ok(value),
            SettingValue::Pair(_) => Err(kind_mismatch(key, "flag")),
        }
    }

    /// Resolve a coordinate pair setting.
    pub fn resolve_pair(&self, key: SettingKey, overrides: &MapSettings) -> Result<Pair> {
        match self.resolve(key, overrides)? {
            SettingValue::Pair(value) => Ok(value),
            SettingValue::Flag(_) => Err(kind_mismatch(key, "coordinate pair")),
        }
    }
}

fn kind_mismatch(key: SettingKey, expected: &str) -> FgError {
    FgError::configuration(format!("Default for '{}' is not a {}", key, expected), None)
}
