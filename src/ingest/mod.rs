//! The ingest pipeline.
//!
//! One run reads the campaign database and defaults, turns every map
//! directory into a resolved map, assigns ids and builds the new map
//! entries of `db.xml` in memory. Only then are images copied, sidecars
//! written back and the database saved.
//!
//! Nothing is written until every map entry has been built, so a run that
//! fails on one map leaves the campaign untouched.

mod images;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::campaign::{find_campaign_dir, CampaignDatabase};
use crate::config::IngestConfig;
use crate::discovery::map_directories;
use crate::document::save_occluders;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::registry::MapRegistry;
use crate::settings::{DefaultResolver, MapSettings, SETTINGS_FILENAME};
use crate::types::{MapDraft, OccluderSource};

pub use images::{copy_images, CopyStats};

/// State scoped to a single run.
#[derive(Debug)]
pub struct IngestContext {
    pub resolver: DefaultResolver,
    pub registry: MapRegistry,
}

impl IngestContext {
    pub fn new(resolver: DefaultResolver) -> Self {
        Self {
            resolver,
            registry: MapRegistry::new(),
        }
    }

    /// Resolve a draft and register the result.
    pub fn add(&mut self, draft: MapDraft) -> Result<()> {
        let map = draft.resolve(&self.resolver)?;
        self.registry.insert(map)
    }
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub campaign_dir: PathBuf,
    pub maps: usize,
    /// Newly assigned `(map, id)` pairs.
    pub assigned: Vec<(String, u32)>,
    pub images_copied: usize,
    pub images_skipped: usize,
    pub sidecars_written: usize,
}

/// Run a full ingest.
pub fn run(config: &IngestConfig, printer: &Printer) -> Result<IngestReport> {
    let campaign_dir = find_campaign_dir(&config.campaign, config.campaign_dir.as_deref())?;
    info!("Using campaign directory {}", campaign_dir.display());

    let mut db = CampaignDatabase::load(&campaign_dir)?;
    let records = if config.respect_db() {
        db.records()?
    } else {
        debug!("Ignoring existing database values");
        Default::default()
    };

    let campaign_settings = MapSettings::load_or_default(&campaign_dir.join(SETTINGS_FILENAME));
    let mut context = IngestContext::new(DefaultResolver::new(
        campaign_settings,
        config.runtime_defaults(),
    ));

    for (name, dir) in map_directories(&config.map_dir)? {
        let record = records.get(&name).cloned();
        let draft = MapDraft::load(name, dir, record)?;
        if draft.image_layers.is_empty() {
            printer.warning(
                "Empty",
                &format!("{} has no *{} image", draft.name, crate::discovery::GRIDLESS_SUFFIX),
            );
        }
        printer.info(
            "Discovered",
            &format!("{} ({})", draft.name, plural(draft.image_layers.len(), "layer", "layers")),
        );
        context.add(draft)?;
    }

    let assigned = context.registry.assign_missing_ids()?;
    for (name, id) in &assigned {
        printer.status("Assigned", &format!("id {} to {}", id, name));
    }

    // Builds every entry in memory, so broken parent links fail the run
    // before anything is copied or saved.
    let entries = db.update(&context.registry)?;

    let mut report = IngestReport {
        campaign_dir: campaign_dir.clone(),
        maps: context.registry.len(),
        assigned,
        ..Default::default()
    };

    for map in context.registry.iter() {
        let stats = copy_images(map, &campaign_dir, config.overwrite_images)?;
        if stats.copied > 0 {
            printer.status(
                "Copied",
                &format!(
                    "{} to {}",
                    plural(stats.copied, "image", "images"),
                    display_path(&map.campaign_image_dir(&campaign_dir))
                ),
            );
        }
        report.images_copied += stats.copied;
        report.images_skipped += stats.skipped;
    }

    if config.disable_saving {
        debug!("Sidecar saving disabled");
    } else {
        report.sidecars_written = save_sidecars(&context.registry)?;
    }

    db.save()?;
    printer.status(
        "Updated",
        &format!("{} with {}", display_path(db.path()), plural(entries, "map", "maps")),
    );

    Ok(report)
}

/// Write each map's `settings.json` and, for maps owning occluders, its
/// `occluders.xml`. Returns the number of files written.
pub fn save_sidecars(registry: &MapRegistry) -> Result<usize> {
    let mut written = 0;
    for map in registry.iter() {
        debug!("Saving settings for {}", map.name);
        map.to_settings().save(&map.settings_path())?;
        written += 1;

        if let OccluderSource::Owned(shapes) = &map.occluders {
            if save_occluders(&map.occluders_path(), shapes)? {
                written += 1;
            }
        }
    }
    Ok(written)
}
