//! Connection arcs between country hubs.

mod config;
mod hubs;
mod router;

pub use config::{
    ArcColor, ArcDistribution, ArcGroup, ArcStyle, BundleConfig, DashPattern, RandomArcConfig, MAX_BUNDLE_SIZE,
    MAX_RANDOM_ARCS, MIN_ARC_ALTITUDE,
};
pub use hubs::{capital, resolve_hub};
pub use router::{bundle, bundle_offset, random_pair, route_arcs, ArcLayer, ArcSegment};
