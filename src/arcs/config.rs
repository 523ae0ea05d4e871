//! Arc endpoint, bundle and style configuration.

use serde::{Deserialize, Serialize};

use crate::color::{clamp_unit, Rgb, Rgba};

/// Most parallel arcs in one bundle.
pub const MAX_BUNDLE_SIZE: u32 = 64;
/// Most random pairs generated in one build.
pub const MAX_RANDOM_ARCS: u32 = 10_000;
/// Floor for arc altitude; flatter arcs degenerate into the surface.
pub const MIN_ARC_ALTITUDE: f64 = 0.01;

/// Where bundle members are spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcDistribution {
    /// Parallel tracks, offset perpendicular to the path.
    #[default]
    Horizontal,
    /// Stacked arcs, offset in altitude.
    Vertical,
}

/// Shape of a bundle of parallel arcs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub bundle_size: u32,
    pub distribution: ArcDistribution,
    /// Offset between neighbours, in degrees (horizontal) or altitude units.
    pub spacing: f64,
    /// Base arc altitude.
    pub curvature: f64,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            bundle_size: 1,
            distribution: ArcDistribution::Horizontal,
            spacing: 0.0,
            curvature: 0.3,
        }
    }
}

impl BundleConfig {
    pub fn sanitized(&self) -> Self {
        let finite = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            bundle_size: self.bundle_size.clamp(1, MAX_BUNDLE_SIZE),
            distribution: self.distribution,
            spacing: finite(self.spacing, 0.0),
            curvature: finite(self.curvature, 0.3),
        }
    }
}

/// Deterministic pairs drawn from the loaded country list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomArcConfig {
    pub visible: bool,
    pub count: u32,
    #[serde(flatten)]
    pub bundle: BundleConfig,
}

impl Default for RandomArcConfig {
    fn default() -> Self {
        Self {
            visible: true,
            count: 7,
            bundle: BundleConfig {
                curvature: 0.2,
                ..Default::default()
            },
        }
    }
}

impl RandomArcConfig {
    pub fn sanitized(&self) -> Self {
        Self {
            visible: self.visible,
            count: self.count.min(MAX_RANDOM_ARCS),
            bundle: self.bundle.sanitized(),
        }
    }
}

/// An explicit pair of country codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcGroup {
    pub id: String,
    pub start: String,
    pub end: String,
    pub visible: bool,
    #[serde(flatten)]
    pub bundle: BundleConfig,
}

impl Default for ArcGroup {
    fn default() -> Self {
        Self {
            id: String::new(),
            start: String::new(),
            end: String::new(),
            visible: true,
            bundle: BundleConfig::default(),
        }
    }
}

impl ArcGroup {
    pub fn new(id: &str, start: &str, end: &str) -> Self {
        Self {
            id: id.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            ..Default::default()
        }
    }
}

/// Global arc appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcStyle {
    pub color: Rgb,
    pub color2: Rgb,
    pub gradient: bool,
    pub opacity: f32,
    pub thickness: f32,
    pub animate_ms: u32,
    /// Dash repetitions along a unit arc.
    pub segments: u32,
    /// Fraction of each dash period left empty.
    pub gap: f32,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            color2: Rgb::new(0x00, 0x55, 0xff),
            gradient: false,
            opacity: 0.8,
            thickness: 0.1,
            animate_ms: 7800,
            segments: 100,
            gap: 0.22,
        }
    }
}

/// Arc color resolved once per build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcColor {
    Solid(Rgba),
    Gradient(Rgba, Rgba),
}

/// Dash length and gap, as fractions of the arc length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashPattern {
    pub length: f32,
    pub gap: f32,
}

impl ArcStyle {
    pub fn sanitized(&self) -> Self {
        Self {
            opacity: clamp_unit(self.opacity),
            thickness: if self.thickness.is_finite() { self.thickness.max(0.0) } else { 0.0 },
            segments: self.segments.max(1),
            gap: clamp_unit(self.gap),
            ..self.clone()
        }
    }

    /// Solid or two-stop color with the opacity as alpha.
    pub fn resolve_color(&self) -> ArcColor {
        let opacity = clamp_unit(self.opacity);
        if self.gradient {
            ArcColor::Gradient(self.color.with_opacity(opacity), self.color2.with_opacity(opacity))
        } else {
            ArcColor::Solid(self.color.with_opacity(opacity))
        }
    }

    /// `3 / segments` split into dash and gap by `gap`.
    pub fn dash_pattern(&self) -> DashPattern {
        let s = self.sanitized();
        let period = 3.0 / s.segments as f32;
        DashPattern {
            length: period * (1.0 - s.gap),
            gap: period * s.gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_bundle_fields() {
        let g: ArcGroup = serde_json::from_str(
            r#"{"id": "g1", "start": "CHN", "end": "USA", "bundle_size": 3, "distribution": "vertical", "spacing": 0.5}"#,
        )
        .unwrap();
        assert_eq!(g.bundle.bundle_size, 3);
        assert_eq!(g.bundle.distribution, ArcDistribution::Vertical);
        assert_eq!(g.bundle.curvature, 0.3);
        assert!(g.visible);
    }

    #[test]
    fn test_dash_pattern() {
        let style = ArcStyle {
            segments: 20,
            gap: 0.4,
            ..Default::default()
        };
        let dash = style.dash_pattern();
        assert!((dash.length - 0.09).abs() < 1e-6);
        assert!((dash.gap - 0.06).abs() < 1e-6);

        let degenerate = ArcStyle {
            segments: 0,
            gap: 2.0,
            ..Default::default()
        };
        let dash = degenerate.dash_pattern();
        assert_eq!((dash.length, dash.gap), (0.0, 3.0));
    }

    #[test]
    fn test_resolve_color() {
        let solid = ArcStyle::default().resolve_color();
        assert_eq!(solid, ArcColor::Solid(Rgb::WHITE.with_opacity(0.8)));
        let grad = ArcStyle {
            gradient: true,
            opacity: 5.0,
            ..Default::default()
        }
        .resolve_color();
        assert_eq!(grad, ArcColor::Gradient(Rgb::WHITE.with_opacity(1.0), Rgb::new(0, 0x55, 0xff).with_opacity(1.0)));
    }

    #[test]
    fn test_sanitized_limits() {
        let r = RandomArcConfig {
            count: u32::MAX,
            bundle: BundleConfig {
                bundle_size: 0,
                spacing: f64::NAN,
                ..Default::default()
            },
            ..Default::default()
        }
        .sanitized();
        assert_eq!(r.count, MAX_RANDOM_ARCS);
        assert_eq!(r.bundle.bundle_size, 1);
        assert_eq!(r.bundle.spacing, 0.0);
    }
}
