//! List command implementation.
//!
//! Prints the maps stored in a campaign database, one per line, by id.

use std::path::PathBuf;

use clap::Args;

use crate::campaign::{find_campaign_dir, CampaignDatabase};
use crate::error::{FgError, Result};
use crate::output::{display_path, plural, Printer};
use crate::types::MapRecord;

/// List the maps stored in a campaign
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Campaign name, looked up in the Fantasy Grounds data directory
    #[arg(long, short, conflicts_with = "campaign_dir")]
    pub campaign: Option<String>,

    /// Campaign directory
    #[arg(long)]
    pub campaign_dir: Option<PathBuf>,
}

pub fn run(args: ListArgs, printer: &Printer) -> Result<()> {
    let campaign = args.campaign.unwrap_or_default();
    if campaign.is_empty() && args.campaign_dir.is_none() {
        return Err(FgError::configuration(
            "No campaign given",
            Some("Pass --campaign NAME or --campaign-dir DIR"),
        ));
    }

    let campaign_dir = find_campaign_dir(&campaign, args.campaign_dir.as_deref())?;
    let db = CampaignDatabase::load(&campaign_dir)?;

    let mut records: Vec<MapRecord> = db.records()?.into_values().collect();
    records.sort_by_key(|record| record.id);

    printer.info(
        "Campaign",
        &format!("{} ({})", display_path(&campaign_dir), plural(records.len(), "map", "maps")),
    );
    for record in &records {
        println!("{}", format_record(record));
    }

    Ok(())
}

fn format_record(record: &MapRecord) -> String {
    let grid = record
        .grid_size
        .map(|size| size.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>5}  {}  grid {}  {}",
        record.id,
        record.name,
        grid,
        plural(record.occluders.len(), "occluder", "occluders")
    )
}
