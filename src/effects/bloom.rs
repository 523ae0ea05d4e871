//! Glow around bright regions.
//!
//! A quarter-size copy keeps only pixels above the luminance threshold,
//! is blurred and brightened, then screened back over the frame.

use image::RgbaImage;

use super::config::PostProcessingConfig;
use super::processor::{EffectContext, EffectProcessor};
use crate::raster::{composite_image, gaussian_blur, par_for_each_pixel, resize_smooth, BlendMode};

/// Alpha of the glow layer at full global intensity.
const GLOW_ALPHA: f32 = 0.6;
/// Downsampling factor of the glow layer.
const GLOW_SCALE: u32 = 4;

fn luminance(c: &[u8]) -> f32 {
    (0.2126 * c[0] as f32 + 0.7152 * c[1] as f32 + 0.0722 * c[2] as f32) / 255.0
}

fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    if e1 <= e0 {
        return if x < e0 { 0.0 } else { 1.0 };
    }
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub struct Bloom;

impl EffectProcessor for Bloom {
    fn name(&self) -> &'static str {
        "bloom"
    }

    fn is_active(&self, config: &PostProcessingConfig) -> bool {
        config.bloom.enabled && config.bloom.amount > 0.0 && config.intensity() > 0.0
    }

    fn apply(&self, mut frame: RgbaImage, config: &PostProcessingConfig, ctx: &EffectContext<'_>) -> RgbaImage {
        let bloom = &config.bloom;
        let strength = bloom.strength * bloom.amount / 100.0;
        let gain = (strength * 50.0 + 50.0) / 100.0;
        let sigma = bloom.radius * 12.0 * ctx.pixel_ratio.max(0.0) / GLOW_SCALE as f32;
        let (lo, hi) = (bloom.threshold - bloom.smoothing, bloom.threshold + bloom.smoothing);

        let (w, h) = frame.dimensions();
        let mut glow = resize_smooth(&frame, (w / GLOW_SCALE).max(1), (h / GLOW_SCALE).max(1));
        par_for_each_pixel(&mut glow, |_, _, px| {
            let keep = smoothstep(lo, hi, luminance(px));
            for c in &mut px[..3] {
                *c = (*c as f32 * keep).round() as u8;
            }
        });
        let mut glow = gaussian_blur(&glow, sigma);
        par_for_each_pixel(&mut glow, |_, _, px| {
            for c in &mut px[..3] {
                *c = (*c as f32 * gain).round().min(255.0) as u8;
            }
        });

        composite_image(&mut frame, &glow, BlendMode::Screen, GLOW_ALPHA * config.intensity());
        frame
    }
}
