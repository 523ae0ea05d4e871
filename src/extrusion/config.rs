//! Per-country extrusion and border settings.

use serde::{Deserialize, Serialize};

use crate::color::{clamp_unit, Rgb};
use crate::lattice::GradientAxis;

/// Default raise of every country above the sphere surface.
pub const DEFAULT_LAND_ALTITUDE: f64 = 0.04;
/// Largest accepted extrusion height or land altitude.
pub const MAX_EXTRUSION: f64 = 2.0;

/// Styling for one country, keyed by its ISO code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryStyle {
    pub id: String,
    pub color: Rgb,
    pub color2: Rgb,
    pub gradient_enabled: bool,
    pub gradient_axis: GradientAxis,
    /// Extra altitude on top of the land altitude.
    pub height: f64,
    pub opacity: f32,
    /// Leave the cap transparent so the sphere texture shows through.
    pub texture_sync: bool,
}

impl Default for CountryStyle {
    fn default() -> Self {
        Self {
            id: "CHN".to_string(),
            color: Rgb::WHITE,
            color2: Rgb::BLACK,
            gradient_enabled: false,
            gradient_axis: GradientAxis::Y,
            height: 0.09,
            opacity: 0.44,
            texture_sync: false,
        }
    }
}

impl CountryStyle {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn sanitized(&self) -> Self {
        Self {
            height: clamp_extrusion(self.height),
            opacity: clamp_unit(self.opacity),
            ..self.clone()
        }
    }
}

/// Outline drawn around every extruded country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    pub visible: bool,
    pub width: f32,
    pub color: Rgb,
    /// South-to-north second stop when `gradient_enabled` is set.
    pub color2: Rgb,
    pub gradient_enabled: bool,
    pub opacity: f32,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            visible: true,
            width: 0.3,
            color: Rgb::WHITE,
            color2: Rgb::WHITE,
            gradient_enabled: false,
            opacity: 0.99,
        }
    }
}

impl BorderConfig {
    /// Zero or invalid widths fall back to a hairline.
    pub fn sanitized(&self) -> Self {
        let width = if self.width.is_finite() && self.width > 0.0 { self.width } else { 0.1 };
        Self {
            width,
            opacity: clamp_unit(self.opacity),
            ..self.clone()
        }
    }
}

pub(crate) fn clamp_extrusion(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, MAX_EXTRUSION)
    } else {
        0.0
    }
}
