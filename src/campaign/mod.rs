//! The campaign database (`db.xml`).
//!
//! The database is read once, its map entries are replaced wholesale by
//! [`CampaignDatabase::update`], and [`CampaignDatabase::save`] writes the
//! whole document back in a single final step.

mod lookup;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::document::{build_map_node, parse_map_record};
use crate::error::{FgError, Result};
use crate::registry::MapRegistry;
use crate::types::MapRecord;
use crate::xml::{read_file, render_document, Element, Node};

pub use lookup::{find_campaign_dir, CAMPAIGN_SEARCH_PATH};

/// The name of the database file inside a campaign directory.
pub const DB_FILENAME: &str = "db.xml";

/// Name of the container element holding map entries.
pub const IMAGE_CONTAINER: &str = "image";

/// A loaded campaign database.
#[derive(Debug, Clone)]
pub struct CampaignDatabase {
    campaign_dir: PathBuf,
    path: PathBuf,
    root: Element,
}

impl CampaignDatabase {
    /// Load `db.xml` from a campaign directory.
    pub fn load(campaign_dir: impl AsRef<Path>) -> Result<Self> {
        let campaign_dir = campaign_dir.as_ref().to_path_buf();
        let path = campaign_dir.join(DB_FILENAME);
        info!("Loading campaign database {}", path.display());

        if !path.is_file() {
            return Err(FgError::configuration(
                format!("No {} file found in {}", DB_FILENAME, campaign_dir.display()),
                Some("Open the campaign in Fantasy Grounds once so it creates db.xml, then check the campaign directory"),
            ));
        }

        let root = read_file(&path)?;
        Ok(Self::from_root(campaign_dir, root))
    }

    /// Wrap an already parsed document.
    pub fn from_root(campaign_dir: impl Into<PathBuf>, root: Element) -> Self {
        let campaign_dir = campaign_dir.into();
        let path = campaign_dir.join(DB_FILENAME);
        Self {
            campaign_dir,
            path,
            root,
        }
    }

    pub fn campaign_dir(&self) -> &Path {
        &self.campaign_dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The container of map entries, if the document has one.
    pub fn image(&self) -> Option<&Element> {
        self.root.find(IMAGE_CONTAINER)
    }

    /// Map records currently stored in the document, keyed by map name.
    pub fn records(&self) -> Result<BTreeMap<String, MapRecord>> {
        let mut records = BTreeMap::new();
        let Some(image) = self.image() else {
            return Ok(records);
        };

        debug!("Retrieving map data from {}", self.path.display());
        for node in image.elements() {
            let record = parse_map_record(node)?;
            debug!("Registered campaign information for {}", record.name);
            records.insert(record.name.clone(), record);
        }

        Ok(records)
    }

    /// Replace every map entry with freshly built entries, sorted by id.
    ///
    /// Returns the number of entries written.
    pub fn update(&mut self, maps: &MapRegistry) -> Result<usize> {
        let mut nodes = Vec::with_capacity(maps.len());
        for map in maps.iter() {
            let layers = maps.layers(&map.name)?;
            let node = build_map_node(map, &layers)?;
            nodes.push((map.id.get().unwrap_or_default(), node));
        }
        nodes.sort_by_key(|(id, _)| *id);

        let mut image = Element::new(IMAGE_CONTAINER);
        if let Some(existing) = self.image() {
            image.attributes = existing.attributes.clone();
        }
        for (_, node) in nodes {
            image.push(node);
        }

        let written = image.children.len();
        self.replace_image(image);
        Ok(written)
    }

    /// Render the full document.
    pub fn render(&self) -> String {
        render_document(&self.root)
    }

    /// Write the document to its file, overwriting previous contents.
    pub fn save(&self) -> Result<()> {
        let rendered = self.render();
        fs::write(&self.path, rendered)
            .map_err(|e| FgError::io(&self.path, format!("Failed to write database: {}", e)))?;
        info!("Saved campaign database {}", self.path.display());
        Ok(())
    }

    /// Put `image` where the old container was, or append it.
    fn replace_image(&mut self, image: Element) {
        let position = self
            .root
            .children
            .iter()
            .position(|child| matches!(child, Node::Element(el) if el.name == IMAGE_CONTAINER));

        match position {
            Some(index) => self.root.children[index] = Node::Element(image),
            None => self.root.push(image),
        }
    }
}
