//! Brightness, contrast, hue rotation and saturation in one pass.
//!
//! Each operation uses the filter-effects definition of its CSS
//! counterpart and clamps to [0, 1] after every step.

use image::RgbaImage;

use super::config::PostProcessingConfig;
use super::processor::{EffectContext, EffectProcessor};
use crate::raster::par_for_each_pixel;

type Matrix3 = [[f32; 3]; 3];

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ColorOp {
    /// Linear scale of every channel.
    Brightness(f32),
    /// Scale around mid gray.
    Contrast(f32),
    /// Hue rotation or saturation matrix.
    Matrix(Matrix3),
}

impl ColorOp {
    fn apply(&self, c: [f32; 3]) -> [f32; 3] {
        let out = match self {
            ColorOp::Brightness(b) => [c[0] * b, c[1] * b, c[2] * b],
            ColorOp::Contrast(k) => [(c[0] - 0.5) * k + 0.5, (c[1] - 0.5) * k + 0.5, (c[2] - 0.5) * k + 0.5],
            ColorOp::Matrix(m) => [
                m[0][0] * c[0] + m[0][1] * c[1] + m[0][2] * c[2],
                m[1][0] * c[0] + m[1][1] * c[1] + m[1][2] * c[2],
                m[2][0] * c[0] + m[2][1] * c[1] + m[2][2] * c[2],
            ],
        };
        out.map(|v| v.clamp(0.0, 1.0))
    }
}

fn hue_rotate(degrees: f32) -> Matrix3 {
    let (s, c) = degrees.to_radians().sin_cos();
    [
        [0.213 + c * 0.787 - s * 0.213, 0.715 - c * 0.715 - s * 0.715, 0.072 - c * 0.072 + s * 0.928],
        [0.213 - c * 0.213 + s * 0.143, 0.715 + c * 0.285 + s * 0.140, 0.072 - c * 0.072 - s * 0.283],
        [0.213 - c * 0.213 - s * 0.787, 0.715 - c * 0.715 + s * 0.715, 0.072 + c * 0.928 + s * 0.072],
    ]
}

fn saturate(s: f32) -> Matrix3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

/// Resolves the grading chain, leaving out identity steps.
pub(crate) fn grade_ops(config: &PostProcessingConfig) -> Vec<ColorOp> {
    let global = config.intensity();
    let mut ops = Vec::new();

    let bc = &config.brightness_contrast;
    if bc.enabled {
        let k = bc.intensity / 100.0 * global;
        let brightness = (100.0 + (bc.brightness - 100.0) * k).max(0.0) / 100.0;
        let contrast = (100.0 + (bc.contrast - 100.0) * k).max(0.0) / 100.0;
        if brightness != 1.0 {
            ops.push(ColorOp::Brightness(brightness));
        }
        if contrast != 1.0 {
            ops.push(ColorOp::Contrast(contrast));
        }
    }

    let hs = &config.hue_saturation;
    if hs.enabled {
        let k = hs.intensity / 100.0 * global;
        let degrees = hs.hue * 3.6 * k;
        // Saturation 10 maps to 100 %.
        let saturation = (100.0 + (hs.saturation * 10.0 - 100.0) * k).max(0.0) / 100.0;
        if degrees % 360.0 != 0.0 {
            ops.push(ColorOp::Matrix(hue_rotate(degrees)));
        }
        if saturation != 1.0 {
            ops.push(ColorOp::Matrix(saturate(saturation)));
        }
    }
    ops
}

pub struct ColorGrade;

impl EffectProcessor for ColorGrade {
    fn name(&self) -> &'static str {
        "color_grade"
    }

    fn is_active(&self, config: &PostProcessingConfig) -> bool {
        !grade_ops(config).is_empty()
    }

    fn apply(&self, mut frame: RgbaImage, config: &PostProcessingConfig, _ctx: &EffectContext<'_>) -> RgbaImage {
        let ops = grade_ops(config);
        if ops.is_empty() {
            return frame;
        }
        par_for_each_pixel(&mut frame, |_, _, px| {
            let mut c = [px[0] as f32 / 255.0, px[1] as f32 / 255.0, px[2] as f32 / 255.0];
            for op in &ops {
                c = op.apply(c);
            }
            for i in 0..3 {
                px[i] = (c[i] * 255.0).round() as u8;
            }
        });
        frame
    }
}
