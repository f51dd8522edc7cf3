//! Ingest command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::config::{IngestConfig, Overrides};
use crate::error::Result;
use crate::ingest;
use crate::output::{display_path, plural, Printer};

/// Import a directory of maps into a campaign
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Directory holding one subdirectory per map
    pub map_dir: PathBuf,

    /// Campaign name (default: the map directory's name)
    #[arg(long, short)]
    pub campaign: Option<String>,

    /// Campaign directory, instead of looking the campaign up by name
    #[arg(long)]
    pub campaign_dir: Option<PathBuf>,

    /// Default grid size [default: 100]
    #[arg(long)]
    pub grid_size: Option<u32>,

    /// Default horizontal grid offset [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    pub grid_offset_x: Option<i64>,

    /// Default vertical grid offset [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    pub grid_offset_y: Option<i64>,

    /// Default brush size; 0 means a tenth of the grid size
    #[arg(long)]
    pub brush_size: Option<f64>,

    /// Replace images already copied into the campaign
    #[arg(long)]
    pub overwrite_images: bool,

    /// Ignore values stored in db.xml (implies --disable-saving)
    #[arg(long)]
    pub overwrite_db: bool,

    /// Don't write settings.json and occluders.xml next to the maps
    #[arg(long)]
    pub disable_saving: bool,

    /// Default to players not being allowed to draw
    #[arg(long)]
    pub disallow_player_drawing: bool,

    /// Default to no grid
    #[arg(long)]
    pub disable_grid: bool,

    /// Default to no grid snapping
    #[arg(long)]
    pub disable_grid_snap: bool,
}

impl IngestArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            campaign: self.campaign.clone(),
            campaign_dir: self.campaign_dir.clone(),
            grid_size: self.grid_size,
            grid_offset_x: self.grid_offset_x,
            grid_offset_y: self.grid_offset_y,
            brush_size: self.brush_size,
            overwrite_images: self.overwrite_images,
            overwrite_db: self.overwrite_db,
            disable_saving: self.disable_saving,
            disallow_player_drawing: self.disallow_player_drawing,
            disable_grid: self.disable_grid,
            disable_grid_snap: self.disable_grid_snap,
        }
    }
}

pub fn run(args: IngestArgs, printer: &Printer) -> Result<()> {
    let overrides = args.overrides();
    let config = IngestConfig::load(args.map_dir, overrides)?;
    printer.info(
        "Ingesting",
        &format!("{} into campaign {}", display_path(&config.map_dir), printer.bold(&config.campaign)),
    );

    let report = ingest::run(&config, printer)?;

    let mut summary = format!(
        "{}, {} copied",
        plural(report.maps, "map", "maps"),
        plural(report.images_copied, "image", "images"),
    );
    if report.images_skipped > 0 {
        summary.push_str(&format!(", {} already present", report.images_skipped));
    }
    if report.sidecars_written > 0 {
        summary.push_str(&format!(
            ", {} saved",
            plural(report.sidecars_written, "sidecar", "sidecars")
        ));
    }
    printer.status("Finished", &summary);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(args: &[&str]) -> IngestArgs {
        match Cli::parse_from(args).command {
            Commands::Ingest(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unset_options_stay_unset() {
        let args = parse(&["fgmap", "ingest", "maps"]);
        let overrides = args.overrides();

        assert_eq!(args.map_dir, PathBuf::from("maps"));
        assert_eq!(overrides.grid_size, None);
        assert_eq!(overrides.brush_size, None);
        assert!(!overrides.overwrite_db);
    }

    #[test]
    fn test_options_are_passed_through() {
        let args = parse(&[
            "fgmap",
            "ingest",
            "maps",
            "--campaign",
            "Keep",
            "--grid-size",
            "140",
            "--grid-offset-x",
            "-5",
            "--overwrite-db",
            "--disable-grid",
        ]);
        let overrides = args.overrides();

        assert_eq!(overrides.campaign.as_deref(), Some("Keep"));
        assert_eq!(overrides.grid_size, Some(140));
        assert_eq!(overrides.grid_offset_x, Some(-5));
        assert!(overrides.overwrite_db);
        assert!(overrides.disable_grid);
    }
}
