//! Post-processing parameters.
//!
//! Slider-style values keep their 0..100 (or 0..200) UI scale here; the
//! processors convert them to unit factors.

use serde::{Deserialize, Serialize};

use crate::geometry::GeoPoint;

/// Largest accepted grain or mosaic cell, in pixels.
pub const MAX_CELL_SIZE: u32 = 512;

fn percent(v: f32, max: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, max)
    } else {
        fallback
    }
}

/// Brightness and contrast, 100 meaning unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessContrastConfig {
    pub enabled: bool,
    pub brightness: f32,
    pub contrast: f32,
    pub intensity: f32,
}

impl Default for BrightnessContrastConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            brightness: 100.0,
            contrast: 100.0,
            intensity: 100.0,
        }
    }
}

/// Hue rotation (0..100 of a full turn) and saturation (10 is neutral).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HueSaturationConfig {
    pub enabled: bool,
    pub hue: f32,
    pub saturation: f32,
    pub intensity: f32,
}

impl Default for HueSaturationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            hue: 0.0,
            saturation: 10.0,
            intensity: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub enabled: bool,
    /// Overall bloom amount, 0..100.
    pub amount: f32,
    /// Luminance (0..1) at the center of the glow cutoff.
    pub threshold: f32,
    /// Half-width of the luminance ramp around `threshold`.
    pub smoothing: f32,
    pub radius: f32,
    pub strength: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 100.0,
            threshold: 0.36,
            smoothing: 0.25,
            radius: 1.0,
            strength: 2.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthOfFieldConfig {
    pub enabled: bool,
    /// Blur strength; the pixel radius is `blur / 5`.
    pub blur: f32,
    /// In-focus range as a percentage of the frame height.
    pub fstop: f32,
    /// Vertical focus position, percent from the top.
    pub focus: f32,
    /// Picked point on the globe that stays sharp.
    pub focal_point: Option<GeoPoint>,
}

impl Default for DepthOfFieldConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            blur: 0.0,
            fstop: 30.0,
            focus: 50.0,
            focal_point: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    pub enabled: bool,
    pub amount: f32,
    /// Approximate block edge in pixels.
    pub size: u32,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 0.0,
            size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaticConfig {
    pub enabled: bool,
    pub amount: f32,
    /// Red channel shift at full amount; blue shifts the opposite way.
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ChromaticConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 0.0,
            offset_x: 15.0,
            offset_y: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteConfig {
    pub enabled: bool,
    pub intensity: f32,
    /// Clear radius as a percentage of half the frame height.
    pub offset: f32,
    /// Edge darkness, 0..100.
    pub darkness: f32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            intensity: 100.0,
            offset: 50.0,
            darkness: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub enabled: bool,
    pub amount: f32,
    pub intensity: f32,
    /// Grain size for layered grain; 25 gives single-pixel cells.
    pub size: f32,
    /// Adds coarser octaves to layered grain as it rises.
    pub roughness: f32,
    pub seed: u64,
    /// Blend size/roughness octaves instead of one independent gray per pixel.
    pub layered: bool,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 36.0,
            intensity: 100.0,
            size: 25.0,
            roughness: 50.0,
            seed: 0,
            layered: false,
        }
    }
}

/// Every export-time effect plus the master switch and global intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessingConfig {
    pub enabled: bool,
    /// Global intensity, 0..100, multiplied into every effect.
    pub opacity: f32,
    pub brightness_contrast: BrightnessContrastConfig,
    pub hue_saturation: HueSaturationConfig,
    pub bloom: BloomConfig,
    pub depth_of_field: DepthOfFieldConfig,
    pub mosaic: MosaicConfig,
    pub chromatic: ChromaticConfig,
    pub vignette: VignetteConfig,
    pub noise: NoiseConfig,
}

impl Default for PostProcessingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 100.0,
            brightness_contrast: BrightnessContrastConfig::default(),
            hue_saturation: HueSaturationConfig::default(),
            bloom: BloomConfig::default(),
            depth_of_field: DepthOfFieldConfig::default(),
            mosaic: MosaicConfig::default(),
            chromatic: ChromaticConfig::default(),
            vignette: VignetteConfig::default(),
            noise: NoiseConfig::default(),
        }
    }
}

impl PostProcessingConfig {
    /// Global intensity as a unit factor.
    pub fn intensity(&self) -> f32 {
        self.opacity / 100.0
    }

    pub fn sanitized(&self) -> Self {
        let bc = &self.brightness_contrast;
        let hs = &self.hue_saturation;
        let bloom = &self.bloom;
        let dof = &self.depth_of_field;
        let ch = &self.chromatic;
        let vig = &self.vignette;
        let noise = &self.noise;
        Self {
            enabled: self.enabled,
            opacity: percent(self.opacity, 100.0, 100.0),
            brightness_contrast: BrightnessContrastConfig {
                enabled: bc.enabled,
                brightness: percent(bc.brightness, 200.0, 100.0),
                contrast: percent(bc.contrast, 200.0, 100.0),
                intensity: percent(bc.intensity, 100.0, 100.0),
            },
            hue_saturation: HueSaturationConfig {
                enabled: hs.enabled,
                hue: percent(hs.hue, 100.0, 0.0),
                saturation: percent(hs.saturation, 100.0, 10.0),
                intensity: percent(hs.intensity, 100.0, 100.0),
            },
            bloom: BloomConfig {
                enabled: bloom.enabled,
                amount: percent(bloom.amount, 100.0, 100.0),
                threshold: percent(bloom.threshold, 3.0, 0.36),
                smoothing: percent(bloom.smoothing, 1.0, 0.25),
                radius: percent(bloom.radius, 10.0, 1.0),
                strength: percent(bloom.strength, 10.0, 2.7),
            },
            depth_of_field: DepthOfFieldConfig {
                enabled: dof.enabled,
                blur: percent(dof.blur, 100.0, 0.0),
                fstop: percent(dof.fstop, 100.0, 30.0),
                focus: percent(dof.focus, 100.0, 50.0),
                focal_point: dof.focal_point.filter(|p| p.lat.is_finite() && p.lng.is_finite()),
            },
            mosaic: MosaicConfig {
                enabled: self.mosaic.enabled,
                amount: percent(self.mosaic.amount, 100.0, 0.0),
                size: self.mosaic.size.min(MAX_CELL_SIZE),
            },
            chromatic: ChromaticConfig {
                enabled: ch.enabled,
                amount: percent(ch.amount, 100.0, 0.0),
                offset_x: if ch.offset_x.is_finite() { ch.offset_x.clamp(-100.0, 100.0) } else { 15.0 },
                offset_y: if ch.offset_y.is_finite() { ch.offset_y.clamp(-100.0, 100.0) } else { 15.0 },
            },
            vignette: VignetteConfig {
                enabled: vig.enabled,
                intensity: percent(vig.intensity, 100.0, 100.0),
                offset: percent(vig.offset, 100.0, 50.0),
                darkness: percent(vig.darkness, 100.0, 80.0),
            },
            noise: NoiseConfig {
                enabled: noise.enabled,
                amount: percent(noise.amount, 100.0, 36.0),
                intensity: percent(noise.intensity, 100.0, 100.0),
                size: percent(noise.size, MAX_CELL_SIZE as f32 * 25.0, 25.0),
                roughness: percent(noise.roughness, 100.0, 50.0),
                seed: noise.seed,
                layered: noise.layered,
            },
        }
    }

    /// Everything off; a pass over this config returns the frame unchanged.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Warm cinematic look: mild bloom, vignette and fine grain.
    pub fn cinematic() -> Self {
        Self {
            bloom: BloomConfig {
                enabled: true,
                amount: 60.0,
                ..Default::default()
            },
            vignette: VignetteConfig {
                enabled: true,
                ..Default::default()
            },
            noise: NoiseConfig {
                enabled: true,
                amount: 20.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: PostProcessingConfig =
            serde_json::from_str(r#"{"vignette": {"enabled": true, "darkness": 60}, "opacity": 50}"#).unwrap();
        assert!(cfg.enabled);
        assert!(cfg.vignette.enabled);
        assert_eq!(cfg.vignette.darkness, 60.0);
        assert_eq!(cfg.vignette.offset, 50.0);
        assert_eq!(cfg.intensity(), 0.5);
        assert_eq!(cfg.bloom.strength, 2.7);
        assert!(cfg.depth_of_field.focal_point.is_none());
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut cfg = PostProcessingConfig::default();
        cfg.opacity = 250.0;
        cfg.vignette.darkness = f32::NAN;
        cfg.mosaic.size = 100_000;
        cfg.depth_of_field.focal_point = Some(GeoPoint::new(f64::NAN, 0.0));
        let s = cfg.sanitized();
        assert_eq!(s.opacity, 100.0);
        assert_eq!(s.vignette.darkness, 80.0);
        assert_eq!(s.mosaic.size, MAX_CELL_SIZE);
        assert!(s.depth_of_field.focal_point.is_none());
    }
}
