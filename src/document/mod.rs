//! Building and reading `db.xml` map entries.
//!
//! A map entry looks like this (layers are listed newest first):
//!
//! ```xml
//! <id-00001>
//!     <image type="image">
//!         <allowplayerdrawing>on</allowplayerdrawing>
//!         <grid>on</grid>
//!         <gridsize>100,100</gridsize>
//!         <gridoffset>0,0</gridoffset>
//!         <gridsnap>on</gridsnap>
//!         <brushsize>10,10</brushsize>
//!         <layers>
//!             <layer>
//!                 <name>Cellar</name>
//!                 <id>1</id>
//!                 <type>image</type>
//!                 <bitmap>campaign/images/Tavern/Cellar.jpg</bitmap>
//!             </layer>
//!             ...
//!         </layers>
//!     </image>
//!     <locked type="number">0</locked>
//!     <name type="string">Tavern</name>
//! </id-00001>
//! ```

mod occluders;

use crate::error::{FgError, Result};
use crate::types::{
    decode_flag, decode_pair, encode_flag, encode_float_pair, encode_int_pair, Layer, MapEntity,
    MapRecord, Pair,
};
use crate::xml::Element;

pub use occluders::{load_occluders, save_occluders, OCCLUDERS_FILENAME, OCCLUDERS_ROOT};

/// Prefix of a map entry's element name.
pub const MAP_TAG_PREFIX: &str = "id-";

/// Element name container for occluder shapes inside a layer.
pub const OCCLUDERS_TAG: &str = "occluders";

/// Element name of a map entry: `id-` and the zero-padded id.
pub fn map_tag(id: u32) -> String {
    format!("{}{:05}", MAP_TAG_PREFIX, id)
}

/// Build the `db.xml` entry for a map.
///
/// `layers` are in creation order; they are written in reverse.
pub fn build_map_node(map: &MapEntity, layers: &[Layer]) -> Result<Element> {
    let id = map.id.get().ok_or_else(|| {
        FgError::configuration(
            format!("Map '{}' has no id", map.name),
            Some("Ids are assigned before maps are written to the database"),
        )
    })?;

    let settings = &map.settings;
    let mut image = Element::new("image")
        .with_attr("type", "image")
        .with_child(text_node("allowplayerdrawing", encode_flag(settings.player_drawing)))
        .with_child(text_node("grid", encode_flag(settings.grid)))
        .with_child(text_node("gridsize", encode_int_pair(&settings.grid_size)))
        .with_child(text_node("gridoffset", encode_int_pair(&settings.grid_offset)))
        .with_child(text_node("gridsnap", encode_flag(settings.grid_snap)))
        .with_child(text_node("brushsize", encode_float_pair(&settings.brush_size)));

    let mut layers_node = Element::new("layers");
    for layer in layers {
        layers_node.push_front(build_layer_node(layer, &map.name));
    }
    image.push(layers_node);

    Ok(Element::new(map_tag(id))
        .with_child(image)
        .with_child(
            Element::new("locked")
                .with_attr("type", "number")
                .with_text("0"),
        )
        .with_child(
            Element::new("name")
                .with_attr("type", "string")
                .with_text(map.name.as_str()),
        ))
}

/// Build a single `<layer>` element.
pub fn build_layer_node(layer: &Layer, map_name: &str) -> Element {
    let mut node = Element::new("layer");

    if let Some(name) = layer.name.as_deref().filter(|n| !n.is_empty()) {
        node.push(text_node("name", name));
    }
    node.push(text_node("id", layer.id.to_string()));
    node.push(text_node("type", "image"));

    let mut bitmap = Element::new("bitmap");
    if let Some(path) = layer.embed_path(map_name) {
        bitmap = bitmap.with_text(path);
    }
    node.push(bitmap);

    if let Some(occluder) = &layer.occluder {
        // Shapes read back from db.xml already come wrapped in their container.
        if occluder.name == OCCLUDERS_TAG {
            node.push(occluder.clone());
        } else {
            node.push(Element::new(OCCLUDERS_TAG).with_child(occluder.clone()));
        }
    }

    node
}

/// Read a map entry back into a [`MapRecord`].
pub fn parse_map_record(node: &Element) -> Result<MapRecord> {
    let id = node
        .name
        .strip_prefix(MAP_TAG_PREFIX)
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(|| FgError::format("map id", node.name.as_str()))?;

    let name = node.child_text("name").ok_or_else(|| FgError::Xml {
        message: format!("Map entry <{}> has no name", node.name),
        help: None,
    })?;

    let mut record = MapRecord {
        id,
        name,
        ..Default::default()
    };

    let Some(image) = node.find("image") else {
        return Ok(record);
    };

    let flag = |field: &str| -> Result<Option<bool>> {
        image
            .child_text(field)
            .map(|token| decode_flag(field, &token))
            .transpose()
    };
    let pair = |field: &str| -> Result<Option<Pair>> {
        image
            .child_text(field)
            .map(|token| decode_pair(field, &token))
            .transpose()
    };

    record.player_drawing = flag("allowplayerdrawing")?;
    record.grid = flag("grid")?;
    record.grid_size = pair("gridsize")?;
    record.grid_offset = Some(pair("gridoffset")?.unwrap_or(Pair::int(0, 0)));
    record.grid_snap = flag("gridsnap")?;
    record.brush_size = pair("brushsize")?;

    if let Some(layers) = image.find("layers") {
        record.occluders = layers
            .elements()
            .filter_map(|layer| layer.find(OCCLUDERS_TAG))
            .filter(|occluders| occluders.has_elements())
            .cloned()
            .collect();
    }

    Ok(record)
}

fn text_node(name: &str, text: impl Into<String>) -> Element {
    Element::new(name).with_text(text)
}
