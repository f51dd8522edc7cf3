//! Map records read back from an existing `db.xml`.

use crate::xml::Element;

use super::Pair;

/// What the campaign database already knows about a map.
///
/// Attributes missing from the stored entry are `None` and fall back to
/// default resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapRecord {
    pub id: u32,
    pub name: String,
    pub player_drawing: Option<bool>,
    pub grid: Option<bool>,
    pub grid_size: Option<Pair>,
    pub grid_offset: Option<Pair>,
    pub grid_snap: Option<bool>,
    pub brush_size: Option<Pair>,

    /// Non-empty `occluders` containers found in the map's layers.
    pub occluders: Vec<Element>,
}
