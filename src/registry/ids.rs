//! Map id allocation.

use std::collections::BTreeSet;

use crate::error::{FgError, Result};
use crate::types::MapId;

/// Compute the final id of every map.
///
/// Assigned ids are kept. Each unassigned map, in order, takes the
/// smallest positive id not yet in use. Two maps that already share an
/// id are a conflict.
///
/// Note: an id freed by removing a map between runs is handed out again.
pub fn allocate_ids(ids: &[(&str, MapId)]) -> Result<Vec<u32>> {
    let mut used = BTreeSet::new();
    for (name, id) in ids {
        if let Some(id) = id.get() {
            if !used.insert(id) {
                let others: Vec<&str> = ids
                    .iter()
                    .filter(|(_, other)| other.get() == Some(id))
                    .map(|(n, _)| *n)
                    .collect();
                return Err(FgError::Conflict {
                    message: format!("Maps {} share id {}", others.join(", "), id),
                    help: Some(format!(
                        "Remove the map_id from the settings.json of all but one of them (last seen: {})",
                        name
                    )),
                });
            }
        }
    }

    let mut next = 1;
    let mut allocated = Vec::with_capacity(ids.len());
    for (_, id) in ids {
        match id.get() {
            Some(id) => allocated.push(id),
            None => {
                while used.contains(&next) {
                    next += 1;
                }
                used.insert(next);
                allocated.push(next);
            }
        }
    }

    Ok(allocated)
}
