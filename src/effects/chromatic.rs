//! Chromatic aberration by per-channel offsets.
//!
//! Red shifts by `(dx, dy)` and blue by `(-dx, -dy)`, both softened by a
//! blur of `|dx| / 10`. The channels recombine with a screen blend and
//! mix with the source at the effect opacity.

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use super::config::PostProcessingConfig;
use super::processor::{EffectContext, EffectProcessor};
use crate::raster::gaussian_blur;

/// One channel of `src` moved by whole pixels; uncovered pixels are clear.
fn shifted_channel(src: &RgbaImage, channel: usize, dx: i64, dy: i64) -> RgbaImage {
    let (w, h) = src.dimensions();
    RgbaImage::from_fn(w, h, |x, y| {
        let (sx, sy) = (x as i64 - dx, y as i64 - dy);
        if sx < 0 || sy < 0 || sx >= w as i64 || sy >= h as i64 {
            return Rgba([0, 0, 0, 0]);
        }
        let p = src.get_pixel(sx as u32, sy as u32).0;
        let mut out = [0, 0, 0, p[3]];
        out[channel] = p[channel];
        Rgba(out)
    })
}

pub struct ChromaticAberration;

impl ChromaticAberration {
    fn offsets(config: &PostProcessingConfig) -> (f32, f32) {
        let k = config.chromatic.amount / 100.0;
        (config.chromatic.offset_x * k, config.chromatic.offset_y * k)
    }
}

impl EffectProcessor for ChromaticAberration {
    fn name(&self) -> &'static str {
        "chromatic"
    }

    fn is_active(&self, config: &PostProcessingConfig) -> bool {
        let (dx, dy) = Self::offsets(config);
        config.chromatic.enabled
            && config.chromatic.amount > 0.0
            && config.intensity() > 0.0
            && (dx.round() != 0.0 || dy.round() != 0.0)
    }

    fn apply(&self, mut frame: RgbaImage, config: &PostProcessingConfig, _ctx: &EffectContext<'_>) -> RgbaImage {
        let (dx, dy) = Self::offsets(config);
        let (ix, iy) = (dx.round() as i64, dy.round() as i64);
        if ix == 0 && iy == 0 {
            return frame;
        }
        let opacity = config.chromatic.amount / 100.0 * config.intensity();
        let sigma = dx.abs() / 10.0;
        let red = gaussian_blur(&shifted_channel(&frame, 0, ix, iy), sigma);
        let blue = gaussian_blur(&shifted_channel(&frame, 2, -ix, -iy), sigma);

        let stride = frame.width() as usize * 4;
        frame
            .par_chunks_mut(stride)
            .zip(red.par_chunks(stride).zip(blue.par_chunks(stride)))
            .for_each(|(row, (rrow, brow))| {
                for ((px, r), b) in row.chunks_exact_mut(4).zip(rrow.chunks_exact(4)).zip(brow.chunks_exact(4)) {
                    let unit = |v: u8| v as f32 / 255.0;
                    let (ra, ga, ba) = (unit(r[3]), unit(px[3]), unit(b[3]));
                    // Premultiplied channels; each layer carries only one.
                    let split = [
                        unit(r[0]) * ra,
                        unit(px[1]) * ga,
                        unit(b[2]) * ba,
                        1.0 - (1.0 - ra) * (1.0 - ga) * (1.0 - ba),
                    ];
                    let sa = unit(px[3]);
                    let source = [unit(px[0]) * sa, unit(px[1]) * sa, unit(px[2]) * sa, sa];
                    let mixed: [f32; 4] = std::array::from_fn(|i| opacity * split[i] + (1.0 - opacity) * source[i]);
                    let alpha = mixed[3].clamp(0.0, 1.0);
                    for i in 0..3 {
                        let straight = if alpha > 0.0 { mixed[i] / alpha } else { 0.0 };
                        px[i] = (straight.clamp(0.0, 1.0) * 255.0).round() as u8;
                    }
                    px[3] = (alpha * 255.0).round() as u8;
                }
            });
        frame
    }
}
