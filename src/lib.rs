//! fgmap - Fantasy Grounds battlemap ingest
//!
//! Turns a directory of layered battlemap images into map entries of a
//! Fantasy Grounds campaign database, copying the images into the campaign
//! and keeping per-map settings in sidecar files next to the sources.

pub mod campaign;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod document;
pub mod error;
pub mod ingest;
pub mod output;
pub mod registry;
pub mod settings;
pub mod types;
pub mod xml;

pub use campaign::{find_campaign_dir, CampaignDatabase};
pub use config::{IngestConfig, Manifest, Overrides};
pub use discovery::{discover_layers, map_directories};
pub use document::{build_map_node, parse_map_record};
pub use error::{FgError, Result};
pub use ingest::{IngestContext, IngestReport};
pub use registry::{allocate_ids, MapRegistry};
pub use settings::{DefaultResolver, MapSettings, RuntimeDefaults, SettingKey, SettingValue};
pub use types::{
    decode_flag, decode_pair, encode_flag, encode_float_pair, encode_int_pair, Layer, MapDraft,
    MapEntity, MapId, MapRecord, MapSettingsResolved, OccluderSource, Pair,
};
pub use xml::Element;
