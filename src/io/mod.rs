//! Model I/O - Loading and saving GIS models
//!
//! A persisted model is a linear stream of primitives in the order fixed by
//! [`MODEL_LAYOUT`]. [`write_model`] and [`read_model`] work with any
//! [`ModelEncoder`] / [`ModelDecoder`]; [`save_model`] and [`load_model`]
//! bind them to the plain-text codec over a file, gzip- or zstd-compressed
//! when the file name says so.

mod codec;
mod format;
mod layout;
mod model;
mod persist;
mod plain_text;
mod transport;


pub use codec::{ModelDecoder, ModelEncoder};
pub use format::SaveConfig;
pub use layout::{Field, Kind, Step, MODEL_LAYOUT};
pub use model::{ActiveOutcome, GisModel};
pub use persist::{
    from_text, load_model, load_model_with, read_model, save_model, to_text, write_model,
};
pub use plain_text::{PlainTextModelReader, PlainTextModelWriter};
pub use transport::{open_source, Compression, FileSink, Sink};
