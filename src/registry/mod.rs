//! Run-scoped registry of maps.
//!
//! The registry owns every map built during one run, keyed by name and
//! kept in creation order. Occluder inheritance is resolved through it:
//! a map with a parent holds only the parent's name, and every lookup
//! follows that name to whatever the parent owns at that moment.
//!
//! # Example
//!
//! ```ignore
//! use fgmap::registry::MapRegistry;
//!
//! let mut registry = MapRegistry::new();
//! registry.insert(tavern)?;
//! registry.insert(cellar)?; // parent_map = "Tavern"
//!
//! let shapes = registry.occluders("Cellar")?; // Tavern's occluders
//! ```

mod ids;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{FgError, Result};
use crate::types::{Layer, MapEntity, OccluderSource};
use crate::xml::Element;

pub use ids::allocate_ids;

/// Maps built during one run.
#[derive(Debug, Default)]
pub struct MapRegistry {
    maps: Vec<MapEntity>,
    index: HashMap<String, usize>,
}

impl MapRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a map. Names are unique.
    pub fn insert(&mut self, map: MapEntity) -> Result<()> {
        if self.index.contains_key(&map.name) {
            return Err(FgError::Conflict {
                message: format!("Map '{}' is defined twice", map.name),
                help: None,
            });
        }

        debug!("Registered map {}", map.name);
        self.index.insert(map.name.clone(), self.maps.len());
        self.maps.push(map);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MapEntity> {
        self.index.get(name).map(|&i| &self.maps[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MapEntity> {
        self.index.get(name).map(|&i| &mut self.maps[i])
    }

    /// Maps in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &MapEntity> {
        self.maps.iter()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Replace the occluders a map owns.
    ///
    /// Maps inheriting from it see the new shapes on their next lookup.
    pub fn set_occluders(&mut self, name: &str, occluders: Vec<Element>) -> Result<()> {
        let map = self.get_mut(name).ok_or_else(|| unknown_map(name))?;
        map.occluders = OccluderSource::Owned(occluders);
        Ok(())
    }

    /// The occluders in effect for a map, following parent links.
    pub fn occluders(&self, name: &str) -> Result<&[Element]> {
        let mut current = name;
        let mut visited = HashSet::new();

        loop {
            let map = self.get(current).ok_or_else(|| {
                if current == name {
                    unknown_map(name)
                } else {
                    FgError::configuration(
                        format!("Parent map '{}' of '{}' does not exist", current, name),
                        Some("Check parent_map in the map's settings.json"),
                    )
                }
            })?;

            match &map.occluders {
                OccluderSource::Owned(shapes) => return Ok(shapes),
                OccluderSource::Inherited(parent) => {
                    if !visited.insert(current) {
                        return Err(FgError::configuration(
                            format!("Parent maps of '{}' form a cycle through '{}'", name, current),
                            Some("A map cannot be its own ancestor"),
                        ));
                    }
                    current = parent;
                }
            }
        }
    }

    /// A map's layers: its image layers followed by one layer per occluder.
    pub fn layers(&self, name: &str) -> Result<Vec<Layer>> {
        let map = self.get(name).ok_or_else(|| unknown_map(name))?;
        let mut layers = map.image_layers().to_vec();

        let first_id = layers.len() as u32;
        for (offset, occluder) in self.occluders(name)?.iter().enumerate() {
            layers.push(Layer::occluder(first_id + offset as u32, occluder.clone()));
        }

        Ok(layers)
    }

    /// Give every map without an id the lowest unused one.
    ///
    /// Returns the newly assigned `(name, id)` pairs in creation order.
    pub fn assign_missing_ids(&mut self) -> Result<Vec<(String, u32)>> {
        let current: Vec<(&str, _)> = self
            .maps
            .iter()
            .map(|map| (map.name.as_str(), map.id))
            .collect();
        let allocated = allocate_ids(&current)?;

        let mut assigned = Vec::new();
        for (map, id) in self.maps.iter_mut().zip(allocated) {
            if map.id.is_assigned() {
                continue;
            }
            map.id.assign(&map.name, id)?;
            debug!("Setting {} to id {}", map.name, id);
            assigned.push((map.name.clone(), id));
        }

        Ok(assigned)
    }
}

fn unknown_map(name: &str) -> FgError {
    FgError::configuration(format!("Unknown map '{}'", name), None)
}
