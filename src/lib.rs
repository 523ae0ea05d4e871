//! Globe scene builder.
//!
//! Composites equirectangular sphere textures from country geometry and
//! satellite imagery, samples decorative lattice cells over the globe,
//! routes connection arcs between country hubs and re-creates the live
//! post-processing stack for still exports.

pub mod arcs;
pub mod color;
pub mod effects;
pub mod export;
pub mod extrusion;
pub mod geometry;
pub mod lattice;
pub mod loader;
pub mod pipeline;
pub mod raster;
pub mod texture;

pub use arcs::{route_arcs, ArcLayer, ArcStyle};
pub use effects::{EffectsCompositor, PostProcessingConfig};
pub use geometry::{CountrySet, GeoPoint, OrbitView};
pub use lattice::{sample_strata, LatticeStratum};
pub use loader::SceneConfig;
pub use pipeline::{JobSlot, Pipeline, Scene, SceneStage};
pub use texture::{compose_texture, TextureConfig};
