//! Export of composited maps, stills and derived data.

mod json;
mod png;
mod still;

pub use json::write_json;
pub use png::{encode_png, write_png, ExportError, PngOptions};
pub use still::{export_still, spawn_export, ExportOptions, MAX_SUPERSAMPLE};
