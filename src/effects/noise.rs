//! Seeded film grain, overlay-blended over the frame.
//!
//! By default every pixel gets an independent gray. Layered grain
//! instead blends block octaves sized by `size` and `roughness`.

use image::RgbaImage;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::{NoiseConfig, PostProcessingConfig};
use super::processor::{EffectContext, EffectProcessor};
use crate::raster::{composite_pixel, par_for_each_pixel, BlendMode};

/// Noise size that maps to single-pixel grain.
const UNIT_GRAIN_SIZE: f32 = 25.0;

/// One octave of value noise: a random gray per `cell` x `cell` block.
struct GrainLayer {
    cell: u32,
    cols: u32,
    weight: f32,
    values: Vec<f32>,
}

impl GrainLayer {
    fn sample(&self, x: u32, y: u32) -> f32 {
        self.values[((y / self.cell) * self.cols + x / self.cell) as usize]
    }
}

/// Grain edge in pixels for layered grain.
pub fn grain_size(noise: &NoiseConfig) -> u32 {
    ((noise.size / UNIT_GRAIN_SIZE).round() as u32).max(1)
}

/// Octave count of layered grain; roughness 0 still yields one.
pub fn octaves(noise: &NoiseConfig) -> u32 {
    ((noise.roughness / 20.0).ceil() as u32).max(1)
}

fn grain_layers(noise: &NoiseConfig, width: u32, height: u32) -> Vec<GrainLayer> {
    let mut rng = ChaCha8Rng::seed_from_u64(noise.seed);
    if !noise.layered {
        let values = (0..width as usize * height as usize).map(|_| rng.random::<f32>()).collect();
        return vec![GrainLayer {
            cell: 1,
            cols: width,
            weight: 1.0,
            values,
        }];
    }
    let base = grain_size(noise);
    (0..octaves(noise))
        .map(|k| {
            let cell = base.saturating_mul(1 << k).min(width.max(height)).max(1);
            let cols = width.div_ceil(cell);
            let rows = height.div_ceil(cell);
            let values = (0..cols * rows).map(|_| rng.random::<f32>()).collect();
            GrainLayer {
                cell,
                cols,
                weight: 0.5f32.powi(k as i32),
                values,
            }
        })
        .collect()
}

pub struct FilmNoise;

impl FilmNoise {
    fn alpha(config: &PostProcessingConfig) -> f32 {
        config.noise.amount / 100.0 * config.noise.intensity / 100.0 * config.intensity()
    }
}

impl EffectProcessor for FilmNoise {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn is_active(&self, config: &PostProcessingConfig) -> bool {
        config.noise.enabled && Self::alpha(config) > 0.0
    }

    fn apply(&self, mut frame: RgbaImage, config: &PostProcessingConfig, _ctx: &EffectContext<'_>) -> RgbaImage {
        let alpha = Self::alpha(config);
        let layers = grain_layers(&config.noise, frame.width(), frame.height());
        let total: f32 = layers.iter().map(|l| l.weight).sum();
        par_for_each_pixel(&mut frame, |x, y, px| {
            let g = layers.iter().map(|l| l.sample(x, y) * l.weight).sum::<f32>() / total;
            composite_pixel(px, [g, g, g, 1.0], BlendMode::Overlay, alpha);
        });
        frame
    }
}
