//! Export-time post-processing.
//!
//! Rebuilds the live filter stack from raster primitives so a captured
//! frame can carry the same look as the interactive preview.

mod bloom;
mod chromatic;
mod color_grade;
mod config;
mod depth_of_field;
mod mosaic;
mod noise;
mod processor;
mod vignette;

pub use bloom::Bloom;
pub use chromatic::ChromaticAberration;
pub use color_grade::ColorGrade;
pub use config::{
    BloomConfig, BrightnessContrastConfig, ChromaticConfig, DepthOfFieldConfig, HueSaturationConfig, MosaicConfig,
    NoiseConfig, PostProcessingConfig, VignetteConfig, MAX_CELL_SIZE,
};
pub use depth_of_field::{focal_center, focus_radii, DepthOfField};
pub use mosaic::{mosaic_dimensions, Mosaic};
pub use noise::{grain_size, octaves, FilmNoise};
pub use processor::{EffectContext, EffectProcessor, EffectsCompositor};
pub use vignette::{vignette_gradient, Vignette};
