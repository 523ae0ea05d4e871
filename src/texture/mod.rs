//! Sphere texture compositing.

mod cache;
mod compositor;
mod config;

pub use cache::TextureCache;
pub use compositor::{compose_texture, SatelliteImage};
pub use config::{SatelliteLayerConfig, SurfaceLayerConfig, SurfaceStyle, TextureConfig, MAX_TEXTURE_DIM};
pub use crate::raster::BlendMode;
