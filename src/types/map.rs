//! Map entities.
//!
//! A map is built in two phases. [`MapDraft::load`] gathers the raw
//! inputs: discovered image layers, the occluder and settings sidecars,
//! and the database record when the run respects it. [`MapDraft::resolve`]
//! then fills every attribute exactly once and yields an immutable
//! [`MapEntity`]. The only thing left open afterwards is the id, which the
//! allocator settles once every map of the run is known.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::discovery::{discover_layers, layer_name};
use crate::document::{load_occluders, OCCLUDERS_FILENAME};
use crate::error::{FgError, Result};
use crate::settings::{DefaultResolver, MapSettings, SettingKey, SETTINGS_FILENAME};
use crate::xml::Element;

use super::{Layer, MapRecord, Pair};

/// A map id: unassigned until the allocator runs, then fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapId {
    #[default]
    Unassigned,
    Assigned(u32),
}

impl MapId {
    /// Build from an optional stored id; zero counts as unassigned.
    pub fn from_option(id: Option<u32>) -> Self {
        match id {
            Some(id) if id > 0 => MapId::Assigned(id),
            _ => MapId::Unassigned,
        }
    }

    pub fn get(&self) -> Option<u32> {
        match self {
            MapId::Unassigned => None,
            MapId::Assigned(id) => Some(*id),
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, MapId::Assigned(_))
    }

    /// Assign an id to `map`; an id that is already set never changes.
    pub fn assign(&mut self, map: &str, id: u32) -> Result<()> {
        match self {
            MapId::Assigned(existing) => Err(FgError::ImmutableField {
                map: map.to_string(),
                id: *existing,
            }),
            MapId::Unassigned => {
                *self = MapId::Assigned(id);
                Ok(())
            }
        }
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapId::Unassigned => f.write_str("unassigned"),
            MapId::Assigned(id) => write!(f, "{}", id),
        }
    }
}

/// Where a map's occluders come from.
#[derive(Debug, Clone, PartialEq)]
pub enum OccluderSource {
    /// Shapes owned by this map.
    Owned(Vec<Element>),
    /// Shapes looked up through the named parent map on every access.
    Inherited(String),
}

/// Fully resolved display settings of a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettingsResolved {
    pub player_drawing: bool,
    pub grid: bool,
    pub grid_size: Pair,
    pub grid_offset: Pair,
    pub grid_snap: bool,
    pub brush_size: Pair,
}

/// Raw inputs for one map, before default resolution.
#[derive(Debug, Clone)]
pub struct MapDraft {
    pub name: String,
    pub source_dir: PathBuf,
    pub image_layers: Vec<Layer>,
    pub occluders: Vec<Element>,
    pub sidecar: MapSettings,
    pub record: Option<MapRecord>,
}

impl MapDraft {
    /// Discover a map's layers and read its sidecars.
    ///
    /// `record` is the map's entry in the existing database, if the run
    /// respects it. Its occluders win over the occluder sidecar when
    /// non-empty.
    pub fn load(
        name: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        record: Option<MapRecord>,
    ) -> Result<Self> {
        let name = name.into();
        let source_dir = source_dir.into();
        info!("Loading map {}", name);

        let image_layers = discover_layers(&source_dir)?
            .into_iter()
            .enumerate()
            .map(|(index, found)| {
                let layer_name = layer_name(&source_dir, &found.dir);
                debug!("Found layer {} - {}", name, layer_name.as_deref().unwrap_or(""));
                Layer::image(index as u32, layer_name, found.path())
            })
            .collect();

        let sidecar = MapSettings::load_or_default(&source_dir.join(SETTINGS_FILENAME));

        // A child map's occluders belong to its parent; its own are never read.
        let occluders = match (&record, sidecar.parent_map()) {
            (_, Some(parent)) => {
                debug!("Skipping occluders of {}, inherited from {}", name, parent);
                Vec::new()
            }
            (Some(record), None) if !record.occluders.is_empty() => record.occluders.clone(),
            _ => load_occluders(&source_dir.join(OCCLUDERS_FILENAME)),
        };

        Ok(Self {
            name,
            source_dir,
            image_layers,
            occluders,
            sidecar,
            record,
        })
    }

    /// Resolve every attribute.
    ///
    /// Database values are used as-is; anything else goes through the
    /// sidecar, campaign and runtime tiers.
    pub fn resolve(self, resolver: &DefaultResolver) -> Result<MapEntity> {
        let record = self.record.as_ref();
        let sidecar = &self.sidecar;

        let flag = |key: SettingKey, explicit: Option<bool>| match explicit {
            Some(value) => Ok(value),
            None => resolver.resolve_flag(key, sidecar),
        };
        let pair = |key: SettingKey, explicit: Option<Pair>| match explicit {
            Some(value) => Ok(value),
            None => resolver.resolve_pair(key, sidecar),
        };

        let settings = MapSettingsResolved {
            player_drawing: flag(SettingKey::PlayerDrawing, record.and_then(|r| r.player_drawing))?,
            grid: flag(SettingKey::Grid, record.and_then(|r| r.grid))?,
            grid_size: pair(SettingKey::GridSize, record.and_then(|r| r.grid_size))?,
            grid_offset: pair(SettingKey::GridOffset, record.and_then(|r| r.grid_offset))?,
            grid_snap: flag(SettingKey::GridSnap, record.and_then(|r| r.grid_snap))?,
            brush_size: pair(SettingKey::BrushSize, record.and_then(|r| r.brush_size))?,
        };

        let id = match record.map(|r| r.id).filter(|id| *id > 0) {
            Some(id) => MapId::Assigned(id),
            None => MapId::from_option(sidecar.map_id()),
        };

        let occluders = match sidecar.parent_map() {
            Some(parent) => {
                debug!("{} inherits occluders from {}", self.name, parent);
                OccluderSource::Inherited(parent.to_string())
            }
            None => OccluderSource::Owned(self.occluders),
        };

        Ok(MapEntity {
            name: self.name,
            source_dir: self.source_dir,
            id,
            settings,
            image_layers: self.image_layers,
            occluders,
        })
    }
}

/// A resolved map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntity {
    pub name: String,
    pub source_dir: PathBuf,
    pub id: MapId,
    pub settings: MapSettingsResolved,
    image_layers: Vec<Layer>,
    pub occluders: OccluderSource,
}

impl MapEntity {
    pub fn new(
        name: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        id: MapId,
        settings: MapSettingsResolved,
        image_layers: Vec<Layer>,
        occluders: OccluderSource,
    ) -> Self {
        Self {
            name: name.into(),
            source_dir: source_dir.into(),
            id,
            settings,
            image_layers,
            occluders,
        }
    }

    /// Image layers in creation order.
    pub fn image_layers(&self) -> &[Layer] {
        &self.image_layers
    }

    pub fn parent_map(&self) -> Option<&str> {
        match &self.occluders {
            OccluderSource::Inherited(parent) => Some(parent),
            OccluderSource::Owned(_) => None,
        }
    }

    /// Directory name used for the map's images inside the campaign.
    pub fn image_dir_name(&self) -> String {
        self.source_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// The settings document written back to the map's sidecar.
    pub fn to_settings(&self) -> MapSettings {
        MapSettings {
            map_id: self.id.get(),
            name: Some(self.name.clone()),
            parent_map: self.parent_map().map(str::to_string),
            player_drawing: Some(self.settings.player_drawing),
            grid: Some(self.settings.grid),
            grid_size: Some(self.settings.grid_size),
            grid_offset: Some(self.settings.grid_offset),
            grid_snap: Some(self.settings.grid_snap),
            brush_size: Some(self.settings.brush_size),
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.source_dir.join(SETTINGS_FILENAME)
    }

    pub fn occluders_path(&self) -> PathBuf {
        self.source_dir.join(OCCLUDERS_FILENAME)
    }

    /// Where this map's images live inside a campaign directory.
    pub fn campaign_image_dir(&self, campaign_dir: &Path) -> PathBuf {
        campaign_dir.join("images").join(self.image_dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{RuntimeDefaults, SettingValue};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn resolver() -> DefaultResolver {
        let runtime = RuntimeDefaults::new()
            .with(SettingKey::PlayerDrawing, SettingValue::Flag(true))
            .with(SettingKey::Grid, SettingValue::Flag(true))
            .with(SettingKey::GridSize, SettingValue::Pair(Pair::int(100, 100)))
            .with(SettingKey::GridOffset, SettingValue::Pair(Pair::int(0, 0)))
            .with(SettingKey::GridSnap, SettingValue::Flag(true))
            .with(SettingKey::BrushSize, SettingValue::Pair(Pair::float(10.0, 10.0)));
        DefaultResolver::new(MapSettings::default(), runtime)
    }

    #[test]
    fn test_map_id_assign_once() {
        let mut id = MapId::Unassigned;
        id.assign("Tavern", 4).unwrap();
        assert_eq!(id.get(), Some(4));

        let err = id.assign("Tavern", 5).unwrap_err();
        assert!(matches!(err, FgError::ImmutableField { id: 4, .. }));
        assert_eq!(id, MapId::Assigned(4));
    }

    #[test]
    fn test_map_id_zero_is_unassigned() {
        assert_eq!(MapId::from_option(Some(0)), MapId::Unassigned);
        assert_eq!(MapId::from_option(None), MapId::Unassigned);
        assert_eq!(MapId::from_option(Some(2)), MapId::Assigned(2));
    }

    #[test]
    fn test_load_and_resolve_bare_map() {
        let dir = tempdir().unwrap();
        let map_dir = dir.path().join("Tavern");
        fs::create_dir_all(&map_dir).unwrap();
        fs::write(map_dir.join("tavern_gridless.jpg"), b"jpeg").unwrap();

        let map = MapDraft::load("Tavern", &map_dir, None)
            .unwrap()
            .resolve(&resolver())
            .unwrap();

        assert_eq!(map.id, MapId::Unassigned);
        assert_eq!(map.image_layers().len(), 1);
        assert_eq!(map.image_layers()[0].name, None);
        assert_eq!(map.settings.grid_size, Pair::int(100, 100));
        assert_eq!(map.occluders, OccluderSource::Owned(vec![]));
    }

    #[test]
    fn test_sidecar_parent_makes_occluders_inherited() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"map_id": 7, "parent_map": "Tavern", "grid_size": [50, 50]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(OCCLUDERS_FILENAME),
            "<saved-occluders><occluder><id>1</id></occluder></saved-occluders>",
        )
        .unwrap();

        let map = MapDraft::load("Cellar", dir.path(), None)
            .unwrap()
            .resolve(&resolver())
            .unwrap();

        assert_eq!(map.id, MapId::Assigned(7));
        assert_eq!(map.parent_map(), Some("Tavern"));
        assert_eq!(map.settings.grid_size, Pair::int(50, 50));
        assert_eq!(map.occluders, OccluderSource::Inherited("Tavern".to_string()));
    }

    #[test]
    fn test_child_map_own_occluders_not_read() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILENAME), r#"{"parent_map": "Tavern"}"#).unwrap();
        fs::write(
            dir.path().join(OCCLUDERS_FILENAME),
            "<saved-occluders><occluder><id>1</id></occluder></saved-occluders>",
        )
        .unwrap();
        let record = MapRecord {
            id: 4,
            name: "Cellar".to_string(),
            occluders: vec![Element::new("occluders").with_child(Element::new("occluder"))],
            ..Default::default()
        };

        let draft = MapDraft::load("Cellar", dir.path(), Some(record)).unwrap();

        assert!(draft.occluders.is_empty());
    }

    #[test]
    fn test_record_values_win_over_sidecar() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"map_id": 7, "grid_size": [50, 50], "grid": true}"#,
        )
        .unwrap();

        let record = MapRecord {
            id: 2,
            name: "Tavern".to_string(),
            grid: Some(false),
            grid_size: Some(Pair::int(140, 140)),
            occluders: vec![Element::new("occluders").with_child(Element::new("occluder"))],
            ..Default::default()
        };

        let map = MapDraft::load("Tavern", dir.path(), Some(record))
            .unwrap()
            .resolve(&resolver())
            .unwrap();

        assert_eq!(map.id, MapId::Assigned(2));
        assert!(!map.settings.grid);
        assert_eq!(map.settings.grid_size, Pair::int(140, 140));
        // Not in the record, so resolved as usual.
        assert_eq!(map.settings.brush_size, Pair::float(10.0, 10.0));
        match &map.occluders {
            OccluderSource::Owned(shapes) => assert_eq!(shapes.len(), 1),
            other => panic!("unexpected occluders: {other:?}"),
        }
    }

    #[test]
    fn test_to_settings() {
        let map = MapEntity::new(
            "Tavern",
            "/maps/Tavern",
            MapId::Assigned(3),
            MapSettingsResolved {
                player_drawing: true,
                grid: false,
                grid_size: Pair::int(100, 100),
                grid_offset: Pair::int(1, 2),
                grid_snap: true,
                brush_size: Pair::float(10.0, 10.0),
            },
            vec![],
            OccluderSource::Owned(vec![]),
        );

        let settings = map.to_settings();
        assert_eq!(settings.map_id, Some(3));
        assert_eq!(settings.name.as_deref(), Some("Tavern"));
        assert_eq!(settings.parent_map, None);
        assert_eq!(settings.grid, Some(false));
        assert_eq!(settings.grid_offset, Some(Pair::int(1, 2)));
        assert_eq!(
            map.campaign_image_dir(Path::new("/campaign")),
            PathBuf::from("/campaign/images/Tavern")
        );
    }
}
