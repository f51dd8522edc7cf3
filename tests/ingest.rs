//! End-to-end ingest runs against a temporary campaign.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

use fgmap::campaign::DB_FILENAME;
use fgmap::config::{IngestConfig, Manifest, Overrides};
use fgmap::output::Printer;
use fgmap::settings::SETTINGS_FILENAME;
use fgmap::xml::{read_file, Element};
use fgmap::{ingest, CampaignDatabase, FgError, MapSettings, Pair};

const EMPTY_DB: &str = "<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\n<root version=\"4.1\">\n\t<image />\n</root>\n";

struct Fixture {
    _dir: TempDir,
    maps: PathBuf,
    campaign: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let maps = dir.path().join("maps");
        let campaign = dir.path().join("campaign");
        fs::create_dir_all(&maps).unwrap();
        fs::create_dir_all(&campaign).unwrap();
        fs::write(campaign.join(DB_FILENAME), EMPTY_DB).unwrap();
        Self {
            _dir: dir,
            maps,
            campaign,
        }
    }

    fn add_map(&self, name: &str, settings: Option<&str>) -> PathBuf {
        let dir = self.maps.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}_gridless.jpg", name.to_lowercase())), name).unwrap();
        if let Some(settings) = settings {
            fs::write(dir.join(SETTINGS_FILENAME), settings).unwrap();
        }
        dir
    }

    fn config(&self, overrides: Overrides) -> IngestConfig {
        let overrides = Overrides {
            campaign_dir: Some(self.campaign.clone()),
            ..overrides
        };
        IngestConfig::merge(self.maps.clone(), overrides, Manifest::default()).unwrap()
    }

    fn run(&self, overrides: Overrides) -> fgmap::Result<ingest::IngestReport> {
        ingest::run(&self.config(overrides), &Printer::quiet())
    }

    fn db(&self) -> CampaignDatabase {
        CampaignDatabase::load(&self.campaign).unwrap()
    }

    fn db_text(&self) -> String {
        fs::read_to_string(self.campaign.join(DB_FILENAME)).unwrap()
    }
}

fn map_layers<'a>(root: &'a Element, tag: &str) -> Vec<&'a Element> {
    root.find("image")
        .and_then(|image| image.find(tag))
        .and_then(|map| map.find("image"))
        .and_then(|image| image.find("layers"))
        .map(|layers| layers.elements().collect())
        .unwrap_or_default()
}

#[test]
fn test_single_map_with_defaults() {
    let fixture = Fixture::new();
    let tavern = fixture.add_map("Tavern", None);

    let report = fixture.run(Overrides::default()).unwrap();

    assert_eq!(report.maps, 1);
    assert_eq!(report.assigned, vec![("Tavern".to_string(), 1)]);
    assert_eq!(report.images_copied, 1);

    let records = fixture.db().records().unwrap();
    let record = &records["Tavern"];
    assert_eq!(record.id, 1);
    assert_eq!(record.player_drawing, Some(true));
    assert_eq!(record.grid, Some(true));
    assert_eq!(record.grid_snap, Some(true));
    assert_eq!(record.grid_size, Some(Pair::int(100, 100)));
    assert_eq!(record.grid_offset, Some(Pair::int(0, 0)));
    assert_eq!(record.brush_size, Some(Pair::int(10, 10)));

    let root = read_file(&fixture.campaign.join(DB_FILENAME)).unwrap();
    let layers = map_layers(&root, "id-00001");
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].child_text("id").as_deref(), Some("0"));
    assert_eq!(layers[0].find("name"), None);
    assert_eq!(
        layers[0].child_text("bitmap").as_deref(),
        Some("campaign/images/Tavern/.jpg")
    );

    let copied = fixture.campaign.join("images/Tavern/.jpg");
    assert_eq!(fs::read_to_string(copied).unwrap(), "Tavern");

    let sidecar = MapSettings::load_or_default(&tavern.join(SETTINGS_FILENAME));
    assert_eq!(sidecar.map_id, Some(1));
    assert_eq!(sidecar.name.as_deref(), Some("Tavern"));
}

#[test]
fn test_existing_ids_kept() {
    let fixture = Fixture::new();
    fixture.add_map("Tavern", Some(r#"{"map_id": 3}"#));
    fixture.add_map("Dungeon", None);

    let report = fixture.run(Overrides::default()).unwrap();

    assert_eq!(report.assigned, vec![("Dungeon".to_string(), 1)]);

    let records = fixture.db().records().unwrap();
    assert_eq!(records["Dungeon"].id, 1);
    assert_eq!(records["Tavern"].id, 3);

    let text = fixture.db_text();
    let dungeon = text.find("<id-00001>").unwrap();
    let tavern = text.find("<id-00003>").unwrap();
    assert!(dungeon < tavern);
}

#[test]
fn test_rerun_is_stable() {
    let fixture = Fixture::new();
    fixture.add_map("Tavern", Some(r#"{"grid_size": [140, 140]}"#));
    fixture.add_map("Dungeon", None);

    fixture.run(Overrides::default()).unwrap();
    let first = fixture.db_text();

    let report = fixture.run(Overrides::default()).unwrap();
    let second = fixture.db_text();

    assert!(report.assigned.is_empty());
    assert_eq!(report.images_copied, 0);
    assert_eq!(report.images_skipped, 2);
    assert_eq!(first, second);
}

#[test]
fn test_database_values_win_over_sidecar() {
    let fixture = Fixture::new();
    fixture.add_map("Tavern", None);
    fixture.run(Overrides::default()).unwrap();

    // Edit the database as Fantasy Grounds would.
    let edited = fixture
        .db_text()
        .replace("<gridsize>100,100</gridsize>", "<gridsize>70,70</gridsize>");
    fs::write(fixture.campaign.join(DB_FILENAME), edited).unwrap();

    fixture.run(Overrides::default()).unwrap();

    let records = fixture.db().records().unwrap();
    assert_eq!(records["Tavern"].grid_size, Some(Pair::int(70, 70)));
}

#[test]
fn test_overwrite_db_ignores_records_and_skips_sidecars() {
    let fixture = Fixture::new();
    let tavern = fixture.add_map("Tavern", None);
    fs::write(
        fixture.campaign.join(DB_FILENAME),
        "<root><image><id-00007><image><grid>off</grid></image><name>Tavern</name></id-00007></image></root>",
    )
    .unwrap();

    let report = fixture
        .run(Overrides {
            overwrite_db: true,
            ..Default::default()
        })
        .unwrap();

    assert_eq!(report.sidecars_written, 0);
    assert!(!tavern.join(SETTINGS_FILENAME).exists());

    let records = fixture.db().records().unwrap();
    assert_eq!(records["Tavern"].id, 1);
    assert_eq!(records["Tavern"].grid, Some(true));
}

#[test]
fn test_child_map_inherits_parent_occluders() {
    let fixture = Fixture::new();
    let tavern = fixture.add_map("Tavern", None);
    fs::write(
        tavern.join("occluders.xml"),
        "<saved-occluders><occluders><occluder><id>1</id></occluder></occluders></saved-occluders>",
    )
    .unwrap();
    let cellar = fixture.add_map("Cellar", Some(r#"{"parent_map": "Tavern"}"#));

    fixture.run(Overrides::default()).unwrap();

    let records = fixture.db().records().unwrap();
    assert_eq!(records["Cellar"].occluders, records["Tavern"].occluders);
    assert_eq!(records["Cellar"].occluders.len(), 1);
    assert!(!cellar.join("occluders.xml").exists());
}

#[test]
fn test_missing_database_is_fatal() {
    let fixture = Fixture::new();
    fixture.add_map("Tavern", None);
    fs::remove_file(fixture.campaign.join(DB_FILENAME)).unwrap();

    let err = fixture.run(Overrides::default()).unwrap_err();

    assert!(matches!(err, FgError::Configuration { .. }));
    assert!(!fixture.campaign.join("images").exists());
}

#[test]
fn test_conflicting_layers_abort_before_writing() {
    let fixture = Fixture::new();
    let tavern = fixture.add_map("Tavern", None);
    fs::write(tavern.join("other_gridless.jpg"), "other").unwrap();

    let err = fixture.run(Overrides::default()).unwrap_err();

    assert!(matches!(err, FgError::Conflict { .. }));
    assert_eq!(fixture.db_text(), EMPTY_DB);
}

#[test]
fn test_unknown_parent_aborts_before_writing() {
    let fixture = Fixture::new();
    let settings = r#"{"parent_map": "Nope"}"#;
    let cellar = fixture.add_map("Cellar", Some(settings));

    let err = fixture.run(Overrides::default()).unwrap_err();

    assert!(matches!(err, FgError::Configuration { .. }));
    assert!(err.to_string().contains("Nope"));
    assert!(!fixture.campaign.join("images").exists());
    assert_eq!(
        fs::read_to_string(cellar.join(SETTINGS_FILENAME)).unwrap(),
        settings
    );
    assert_eq!(fixture.db_text(), EMPTY_DB);
}

#[test]
fn test_parent_cycle_aborts_before_writing() {
    let fixture = Fixture::new();
    fixture.add_map("Attic", Some(r#"{"parent_map": "Cellar"}"#));
    fixture.add_map("Cellar", Some(r#"{"parent_map": "Attic"}"#));

    let err = fixture.run(Overrides::default()).unwrap_err();

    assert!(matches!(err, FgError::Configuration { .. }));
    assert!(!fixture.campaign.join("images").exists());
    assert_eq!(fixture.db_text(), EMPTY_DB);
}
