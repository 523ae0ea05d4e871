//! Raster compositing primitives.
//!
//! Blend modes, gradients, polygon coverage masks, blur and resampling
//! shared by the texture and effects compositors.

mod blend;
mod filter;
mod gradient;
mod mask;

pub use blend::{composite_image, composite_pixel, to_unit, BlendMode};
pub use filter::{gaussian_blur, par_for_each_pixel, resize_lanczos, resize_nearest, resize_smooth};
pub use gradient::{RadialGradient, VerticalGradient};
pub use mask::CoverageMask;
