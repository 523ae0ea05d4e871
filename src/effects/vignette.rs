//! Edge darkening with a centered radial gradient.

use image::RgbaImage;

use super::config::PostProcessingConfig;
use super::processor::{EffectContext, EffectProcessor};
use crate::color::{Rgb, Rgba};
use crate::raster::{composite_pixel, par_for_each_pixel, BlendMode, RadialGradient};

/// Outer radius as a fraction of frame height.
const OUTER_RADIUS: f32 = 0.8;

/// The gradient drawn over a `width` x `height` frame.
pub fn vignette_gradient(config: &PostProcessingConfig, width: u32, height: u32) -> RadialGradient {
    let v = &config.vignette;
    let h = height as f32;
    RadialGradient {
        cx: width as f32 / 2.0,
        cy: h / 2.0,
        r0: v.offset / 100.0 * (h / 2.0),
        r1: h * OUTER_RADIUS,
        inner: Rgba::TRANSPARENT,
        outer: Rgb::BLACK.with_opacity(v.darkness / 100.0),
    }
}

pub struct Vignette;

impl EffectProcessor for Vignette {
    fn name(&self) -> &'static str {
        "vignette"
    }

    fn is_active(&self, config: &PostProcessingConfig) -> bool {
        let v = &config.vignette;
        v.enabled && v.intensity > 0.0 && v.darkness > 0.0 && config.intensity() > 0.0
    }

    fn apply(&self, mut frame: RgbaImage, config: &PostProcessingConfig, _ctx: &EffectContext<'_>) -> RgbaImage {
        let alpha = config.vignette.intensity / 100.0 * config.intensity();
        let gradient = vignette_gradient(config, frame.width(), frame.height());
        par_for_each_pixel(&mut frame, |x, y, px| {
            composite_pixel(px, gradient.at_pixel(x, y), BlendMode::Normal, alpha);
        });
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba as Pixel;

    fn vignette_config() -> PostProcessingConfig {
        let mut cfg = PostProcessingConfig::default();
        cfg.vignette.enabled = true;
        cfg.vignette.offset = 50.0;
        cfg.vignette.darkness = 80.0;
        cfg.vignette.intensity = 100.0;
        cfg
    }

    #[test]
    fn test_center_unchanged_corner_darkened() {
        let (w, h) = (200, 100);
        let frame = RgbaImage::from_pixel(w, h, Pixel([255, 255, 255, 255]));
        let out = Vignette.apply(frame, &vignette_config(), &EffectContext::default());
        assert_eq!(out.get_pixel(w / 2, h / 2).0, [255, 255, 255, 255]);
        // The corner lies past the outer radius: white under 80 % black.
        let corner = out.get_pixel(0, 0).0;
        assert_eq!(corner, [51, 51, 51, 255]);
    }

    #[test]
    fn test_darkening_grows_outward() {
        let frame = RgbaImage::from_pixel(200, 100, Pixel([255, 255, 255, 255]));
        let out = Vignette.apply(frame, &vignette_config(), &EffectContext::default());
        let row: Vec<u8> = (100..200).map(|x| out.get_pixel(x, 50).0[0]).collect();
        assert!(row.windows(2).all(|w| w[1] <= w[0]));
        assert!(row[99] < 255);
    }

    #[test]
    fn test_zero_darkness_is_inactive() {
        let mut cfg = vignette_config();
        cfg.vignette.darkness = 0.0;
        assert!(!Vignette.is_active(&cfg));
    }
}
