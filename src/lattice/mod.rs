//! Geodesic lattice sampling.
//!
//! Spreads decorative cells quasi-uniformly over the globe with a
//! golden-angle spiral and optionally drops the ones over water.

mod cell;
mod config;
mod sampler;

pub use cell::{CellMesh, CellShapeKey, ShapeCache};
pub use config::{
    FillMode, GradientAxis, LatticeStratum, DEFAULT_STRATUM_DENSITY, FALLBACK_CELL_SIZE, MAX_STRATUM_DENSITY,
};
pub use sampler::{sample_strata, sample_stratum, spiral_point, CellStyle, LatticeLayer, LatticePoint, SURFACE_LIFT};
