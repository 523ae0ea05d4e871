//! Country geometry and globe projection.
//!
//! Holds the immutable country polygon set with its bounding-box index,
//! the point-in-polygon land test, and the mappings from lon/lat into
//! texture pixels and globe world/screen space.

mod country_set;
mod polygon;
mod projection;

pub use country_set::{apply_merge_rules, CountrySet, GeometryError, MergeRule};
pub use polygon::{ring_contains, CountryPolygon, GeoBounds, GeoPoint, Ring};
pub use projection::{equirect_pixel, globe_position, GlobeProjector, OrbitView, GLOBE_RADIUS};

#[cfg(test)]
pub(crate) use country_set::tests::three_countries;
