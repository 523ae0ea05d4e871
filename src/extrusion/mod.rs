//! Extruded country polygons.
//!
//! Each country can be raised above the sphere and given its own cap, side
//! and outline colors; unstyled countries inherit the land layer.

mod config;
mod descriptor;

pub use config::{BorderConfig, CountryStyle, DEFAULT_LAND_ALTITUDE, MAX_EXTRUSION};
pub use descriptor::{extrude_countries, ExtrudedCountry, ExtrusionContext};
