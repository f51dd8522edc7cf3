//! Locating a campaign directory on disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FgError, Result};

/// Where Fantasy Grounds keeps campaigns, relative to a base directory.
pub const CAMPAIGN_SEARCH_PATH: &str = "SmiteWorks/Fantasy Grounds/campaigns";

/// Find the directory of a named campaign.
///
/// An explicit directory must exist. Without one, the campaign is looked
/// up under the user data directory, then under the home directory.
pub fn find_campaign_dir(campaign: &str, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        if dir.is_dir() {
            return Ok(dir.to_path_buf());
        }
        return Err(FgError::configuration(
            format!("Campaign directory {} does not exist", dir.display()),
            Some("Check --campaign-dir or campaign_dir in fgmap.yaml"),
        ));
    }

    let bases = [dirs::data_dir(), dirs::home_dir()];
    let candidates = candidates(campaign, bases.iter().flatten().map(PathBuf::as_path));

    for candidate in &candidates {
        debug!("Looking for campaign in {}", candidate.display());
        if candidate.is_dir() {
            return Ok(candidate.clone());
        }
    }

    let searched = candidates
        .iter()
        .map(|c| c.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(FgError::configuration(
        format!("Could not find campaign '{}' (searched: {})", campaign, searched),
        Some("Pass --campaign-dir or set campaign_dir in fgmap.yaml"),
    ))
}

fn candidates<'a>(campaign: &str, bases: impl Iterator<Item = &'a Path>) -> Vec<PathBuf> {
    bases
        .map(|base| base.join(CAMPAIGN_SEARCH_PATH).join(campaign))
        .collect()
}
