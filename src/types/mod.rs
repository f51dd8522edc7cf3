//! Core types for fgmap maps and their layers.

pub mod codec;
mod layer;
mod map;
mod record;

pub use codec::{decode_flag, decode_pair, encode_flag, encode_float_pair, encode_int_pair, Pair};
pub use layer::Layer;
pub use map::{MapDraft, MapEntity, MapId, MapSettingsResolved, OccluderSource};
pub use record::MapRecord;
