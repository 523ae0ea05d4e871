//! Lattice stratum configuration.

use serde::{Deserialize, Serialize};

use crate::color::{clamp_unit, Rgb};

/// Upper bound on samples per stratum.
pub const MAX_STRATUM_DENSITY: u32 = 20_000;

/// Sample count used when a stratum leaves its density at 0.
pub const DEFAULT_STRATUM_DENSITY: u32 = 1000;

/// Cell edge/size used when a configured size is zero or invalid.
pub const FALLBACK_CELL_SIZE: f32 = 0.1;

/// How a stratum decorates the globe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Flat color shell; produces no lattice points.
    Color,
    /// Extruded polygonal prisms.
    #[default]
    PolygonGrid,
    /// Small spheres.
    DotMatrix,
}

/// Local axis along which a cell's two colors blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientAxis {
    X,
    #[default]
    Y,
    Z,
}

/// One independently styled layer of lattice cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeStratum {
    pub id: String,
    pub visible: bool,
    pub fill_mode: FillMode,
    pub opacity: f32,
    /// Relative altitude above the globe surface.
    pub altitude: f32,
    /// Radial segments of a prism cell.
    pub sides: u32,
    pub size: f32,
    pub height: f32,
    /// Banding segments along the gradient axis.
    pub segments: u32,
    /// Fraction of each band left empty.
    pub gap: f32,
    /// Target sample count; a ceiling when ocean is excluded. 0 means
    /// [`DEFAULT_STRATUM_DENSITY`].
    pub density: u32,
    pub color: Rgb,
    pub color2: Rgb,
    pub gradient_enabled: bool,
    pub gradient_axis: GradientAxis,
    /// XYZ Euler rotation in degrees.
    pub rotation: [f32; 3],
    /// Keep samples over water.
    pub show_sea: bool,
}

impl Default for LatticeStratum {
    fn default() -> Self {
        Self {
            id: "STRATUM_1".to_string(),
            visible: true,
            fill_mode: FillMode::PolygonGrid,
            opacity: 1.0,
            altitude: 0.0,
            sides: 6,
            size: 0.05,
            height: 0.1,
            segments: 1,
            gap: 0.0,
            density: DEFAULT_STRATUM_DENSITY,
            color: Rgb::WHITE,
            color2: Rgb::WHITE,
            gradient_enabled: false,
            gradient_axis: GradientAxis::Y,
            rotation: [0.0; 3],
            show_sea: false,
        }
    }
}

fn positive_or_fallback(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        FALLBACK_CELL_SIZE
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

impl LatticeStratum {
    /// A visible hexagonal grid of `density` cells.
    pub fn hex_grid(id: &str, density: u32) -> Self {
        Self {
            id: id.to_string(),
            density,
            ..Default::default()
        }
    }

    /// A visible dot matrix of `density` cells.
    pub fn dots(id: &str, density: u32) -> Self {
        Self {
            id: id.to_string(),
            fill_mode: FillMode::DotMatrix,
            density,
            ..Default::default()
        }
    }

    /// True when this stratum produces lattice points.
    pub fn is_sampled(&self) -> bool {
        self.visible && self.fill_mode != FillMode::Color
    }

    /// Clamps every range and replaces invalid sizes.
    pub fn sanitized(&self) -> Self {
        Self {
            opacity: clamp_unit(self.opacity),
            altitude: finite_or_zero(self.altitude),
            sides: self.sides.clamp(3, 64),
            size: positive_or_fallback(self.size),
            height: positive_or_fallback(self.height),
            segments: self.segments.max(1),
            gap: clamp_unit(self.gap),
            density: match self.density {
                0 => DEFAULT_STRATUM_DENSITY,
                d => d.min(MAX_STRATUM_DENSITY),
            },
            rotation: self.rotation.map(finite_or_zero),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        let s: LatticeStratum = serde_json::from_str(
            r##"{"fill_mode": "dot_matrix", "gradient_axis": "Z", "density": 50, "color": "#00ff33"}"##,
        )
        .unwrap();
        assert_eq!(s.fill_mode, FillMode::DotMatrix);
        assert_eq!(s.gradient_axis, GradientAxis::Z);
        assert_eq!(s.density, 50);
        assert_eq!(s.sides, 6);
    }

    #[test]
    fn test_sanitized_bounds() {
        let s = LatticeStratum {
            opacity: 2.0,
            sides: 1,
            size: 0.0,
            height: f32::NAN,
            segments: 0,
            gap: 1.5,
            density: u32::MAX,
            rotation: [f32::INFINITY, 10.0, 0.0],
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.opacity, 1.0);
        assert_eq!(s.sides, 3);
        assert_eq!(s.size, FALLBACK_CELL_SIZE);
        assert_eq!(s.height, FALLBACK_CELL_SIZE);
        assert_eq!(s.segments, 1);
        assert_eq!(s.gap, 1.0);
        assert_eq!(s.density, MAX_STRATUM_DENSITY);
        assert_eq!(s.rotation, [0.0, 10.0, 0.0]);
    }

    #[test]
    fn test_color_fill_is_not_sampled() {
        let mut s = LatticeStratum::hex_grid("A", 10);
        assert!(s.is_sampled());
        s.fill_mode = FillMode::Color;
        assert!(!s.is_sampled());
        let hidden = LatticeStratum {
            visible: false,
            ..LatticeStratum::dots("B", 10)
        };
        assert!(!hidden.is_sampled());
    }

    #[test]
    fn test_zero_density_uses_default_count() {
        let s = LatticeStratum::hex_grid("Z", 0);
        assert!(s.is_sampled());
        assert_eq!(s.sanitized().density, DEFAULT_STRATUM_DENSITY);
        assert_eq!(LatticeStratum::hex_grid("N", 7).sanitized().density, 7);
    }
}
