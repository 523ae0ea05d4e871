//! Pixelation by nearest-neighbor upscaling of a reduced copy.

use image::RgbaImage;

use super::config::PostProcessingConfig;
use super::processor::{EffectContext, EffectProcessor};
use crate::raster::{composite_image, resize_nearest, resize_smooth, BlendMode};

/// Reduced raster size for a block size of `size` pixels.
///
/// A zero size falls back to 10. The reduced edge is `ceil(dim * 2 / size)`.
pub fn mosaic_dimensions(width: u32, height: u32, size: u32) -> (u32, u32) {
    let size = if size == 0 { 10 } else { size } as u64;
    let reduce = |d: u32| ((d as u64 * 2).div_ceil(size)).max(1) as u32;
    (reduce(width), reduce(height))
}

pub struct Mosaic;

impl EffectProcessor for Mosaic {
    fn name(&self) -> &'static str {
        "mosaic"
    }

    fn is_active(&self, config: &PostProcessingConfig) -> bool {
        config.mosaic.enabled && config.mosaic.amount > 0.0 && config.intensity() > 0.0
    }

    fn apply(&self, mut frame: RgbaImage, config: &PostProcessingConfig, _ctx: &EffectContext<'_>) -> RgbaImage {
        let (w, h) = frame.dimensions();
        let (sw, sh) = mosaic_dimensions(w, h, config.mosaic.size);
        if (sw, sh) == (w, h) {
            return frame;
        }
        let blocks = resize_nearest(&resize_smooth(&frame, sw, sh), w, h);
        composite_image(&mut frame, &blocks, BlendMode::Normal, config.mosaic.amount / 100.0 * config.intensity());
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_dimensions() {
        assert_eq!(mosaic_dimensions(100, 50, 10), (20, 10));
        assert_eq!(mosaic_dimensions(101, 50, 10), (21, 10));
        assert_eq!(mosaic_dimensions(100, 50, 0), (20, 10));
        assert_eq!(mosaic_dimensions(3, 3, 500), (1, 1));
    }

    #[test]
    fn test_full_amount_gives_flat_blocks() {
        let frame = RgbaImage::from_fn(40, 20, |x, y| Rgba([(x * 6) as u8, (y * 12) as u8, 0, 255]));
        let mut cfg = PostProcessingConfig::default();
        cfg.mosaic.enabled = true;
        cfg.mosaic.amount = 100.0;
        cfg.mosaic.size = 20;
        let out = Mosaic.apply(frame, &cfg, &EffectContext::default());
        // Reduced to 4x2, so every 10x10 block is uniform.
        for (bx, by) in [(0, 0), (10, 0), (30, 10)] {
            let first = out.get_pixel(bx, by);
            for dy in 0..10 {
                for dx in 0..10 {
                    assert_eq!(out.get_pixel(bx + dx, by + dy), first);
                }
            }
        }
    }
}
