//! Configuration for the sphere color map.

use serde::{Deserialize, Serialize};

use crate::color::{clamp_unit, Rgb};
use crate::raster::BlendMode;

/// Largest accepted texture edge, in pixels.
pub const MAX_TEXTURE_DIM: u32 = 8192;

/// How a surface layer is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceStyle {
    /// Flat color or gradient fill.
    #[default]
    Solid,
    /// Fill under satellite imagery; extruded caps go nearly transparent.
    Realistic,
    /// External imagery only, no fill.
    Imagery,
}

/// Fill settings for the land or the ocean layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceLayerConfig {
    pub style: SurfaceStyle,
    pub color: Rgb,
    /// Bottom color when `gradient_enabled` is set.
    pub color2: Rgb,
    pub gradient_enabled: bool,
    pub opacity: f32,
}

impl Default for SurfaceLayerConfig {
    fn default() -> Self {
        Self {
            style: SurfaceStyle::Solid,
            color: Rgb::WHITE,
            color2: Rgb::WHITE,
            gradient_enabled: false,
            opacity: 1.0,
        }
    }
}

impl SurfaceLayerConfig {
    /// Faint white land.
    pub fn land() -> Self {
        Self {
            opacity: 0.1,
            ..Default::default()
        }
    }

    /// Opaque black ocean.
    pub fn ocean() -> Self {
        Self {
            style: SurfaceStyle::Realistic,
            color: Rgb::BLACK,
            color2: Rgb::new(0x33, 0x3d, 0x00),
            gradient_enabled: false,
            opacity: 1.0,
        }
    }

    /// Whether the layer paints a fill at all.
    pub fn paints_fill(&self) -> bool {
        self.style != SurfaceStyle::Imagery
    }

    /// Second gradient stop, or the primary color when the gradient is off.
    pub fn bottom_color(&self) -> Rgb {
        if self.gradient_enabled {
            self.color2
        } else {
            self.color
        }
    }

    pub fn sanitized(&self) -> Self {
        Self {
            opacity: clamp_unit(self.opacity),
            ..self.clone()
        }
    }
}

/// Satellite imagery overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteLayerConfig {
    pub show: bool,
    pub opacity: f32,
    pub blend_mode: BlendMode,
}

impl Default for SatelliteLayerConfig {
    fn default() -> Self {
        Self {
            show: true,
            opacity: 0.28,
            blend_mode: BlendMode::Multiply,
        }
    }
}

impl SatelliteLayerConfig {
    pub fn sanitized(&self) -> Self {
        Self {
            opacity: clamp_unit(self.opacity),
            ..self.clone()
        }
    }
}

/// Everything that shapes the composited sphere texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub width: u32,
    pub height: u32,
    pub land: SurfaceLayerConfig,
    pub ocean: SurfaceLayerConfig,
    pub satellite: SatelliteLayerConfig,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 512,
            land: SurfaceLayerConfig::land(),
            ocean: SurfaceLayerConfig::ocean(),
            satellite: SatelliteLayerConfig::default(),
        }
    }
}

impl TextureConfig {
    /// Clamps opacities and texture dimensions.
    pub fn sanitized(&self) -> Self {
        Self {
            width: self.width.clamp(1, MAX_TEXTURE_DIM),
            height: self.height.clamp(1, MAX_TEXTURE_DIM),
            land: self.land.sanitized(),
            ocean: self.ocean.sanitized(),
            satellite: self.satellite.sanitized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let cfg: TextureConfig = serde_json::from_str(r##"{"ocean": {"color": "#102030"}}"##).unwrap();
        assert_eq!(cfg.width, 1024);
        assert_eq!(cfg.ocean.color, Rgb::new(0x10, 0x20, 0x30));
        assert_eq!(cfg.satellite.blend_mode, BlendMode::Multiply);
    }

    #[test]
    fn test_sanitized_clamps() {
        let cfg = TextureConfig {
            width: 100_000,
            height: 0,
            land: SurfaceLayerConfig {
                opacity: 3.0,
                ..SurfaceLayerConfig::land()
            },
            ocean: SurfaceLayerConfig {
                opacity: f32::NAN,
                ..SurfaceLayerConfig::ocean()
            },
            satellite: SatelliteLayerConfig {
                opacity: -1.0,
                ..Default::default()
            },
        }
        .sanitized();
        assert_eq!((cfg.width, cfg.height), (MAX_TEXTURE_DIM, 1));
        assert_eq!(cfg.land.opacity, 1.0);
        assert_eq!(cfg.ocean.opacity, 0.0);
        assert_eq!(cfg.satellite.opacity, 0.0);
    }

    #[test]
    fn test_source_over_alias() {
        let sat: SatelliteLayerConfig = serde_json::from_str(r#"{"blend_mode": "source-over"}"#).unwrap();
        assert_eq!(sat.blend_mode, BlendMode::Normal);
    }
}
