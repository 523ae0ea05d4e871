//! Resolved render parameters for extruded countries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::config::{clamp_extrusion, BorderConfig, CountryStyle};
use crate::color::{Rgb, Rgba};
use crate::geometry::{CountryPolygon, CountrySet};
use crate::texture::{SurfaceLayerConfig, SurfaceStyle};

/// Cap alpha used over realistic land so the polygon stays pickable.
const REALISTIC_CAP_ALPHA: f32 = 0.01;

/// How one country polygon is drawn above the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudedCountry {
    pub code: String,
    pub altitude: f64,
    pub cap: Rgba,
    pub side: Rgba,
    pub stroke: Rgba,
    pub stroke_width: f32,
}

/// Shared inputs for every country in one build.
#[derive(Debug, Clone, Copy)]
pub struct ExtrusionContext<'a> {
    pub land: &'a SurfaceLayerConfig,
    pub border: &'a BorderConfig,
    pub land_altitude: f64,
}

/// Resolves every polygon in the set, in set order.
///
/// Later style entries for the same code win.
pub fn extrude_countries(countries: &CountrySet, styles: &[CountryStyle], ctx: ExtrusionContext<'_>) -> Vec<ExtrudedCountry> {
    let by_code: HashMap<&str, CountryStyle> = styles.iter().map(|s| (s.id.as_str(), s.sanitized())).collect();
    let land = ctx.land.sanitized();
    let border = ctx.border.sanitized();
    let land_altitude = clamp_extrusion(ctx.land_altitude);

    countries
        .countries()
        .iter()
        .map(|country| extrude_country(country, by_code.get(country.code()), &land, &border, land_altitude))
        .collect()
}

fn extrude_country(
    country: &CountryPolygon,
    style: Option<&CountryStyle>,
    land: &SurfaceLayerConfig,
    border: &BorderConfig,
    land_altitude: f64,
) -> ExtrudedCountry {
    let altitude = style.map_or(0.0, |s| land_altitude + s.height);
    ExtrudedCountry {
        code: country.code().to_string(),
        altitude,
        cap: cap_color(style, land),
        side: side_color(style, land),
        stroke: stroke_color(country, border),
        stroke_width: if border.visible { border.width } else { 0.0 },
    }
}

fn cap_color(style: Option<&CountryStyle>, land: &SurfaceLayerConfig) -> Rgba {
    match style {
        Some(s) if s.texture_sync => Rgba::TRANSPARENT,
        Some(s) if s.gradient_enabled => s.color.lerp(s.color2, 0.5).with_opacity(s.opacity),
        Some(s) => s.color.with_opacity(s.opacity),
        None if land.style == SurfaceStyle::Realistic => Rgb::BLACK.with_opacity(REALISTIC_CAP_ALPHA),
        None if land.gradient_enabled => land.color.lerp(land.color2, 0.5).with_opacity(land.opacity),
        None => land.color.with_opacity(land.opacity),
    }
}

fn side_color(style: Option<&CountryStyle>, land: &SurfaceLayerConfig) -> Rgba {
    match style {
        Some(s) => s.color.with_opacity(s.opacity),
        None => land.color.with_opacity(land.opacity),
    }
}

fn stroke_color(country: &CountryPolygon, border: &BorderConfig) -> Rgba {
    if !border.visible {
        return Rgba::TRANSPARENT;
    }
    let color = if border.gradient_enabled {
        let t = ((country.bounds().mid_lat() + 90.0) / 180.0) as f32;
        border.color.lerp(border.color2, t)
    } else {
        border.color
    };
    color.with_opacity(border.opacity)
}
