//! Separable blend modes and source-over compositing.
//!
//! All math runs on straight-alpha unit floats; 8-bit pixels are
//! converted on the way in and rounded on the way out.

use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::filter::resize_smooth;

/// How a source layer's color combines with the backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    #[serde(alias = "source-over")]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
}

impl BlendMode {
    pub const ALL: [BlendMode; 6] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
        }
    }

    /// Blend function `B(cb, cs)` for one channel in [0, 1].
    #[inline]
    pub fn mix(self, cb: f32, cs: f32) -> f32 {
        match self {
            BlendMode::Normal => cs,
            BlendMode::Multiply => cb * cs,
            BlendMode::Screen => cb + cs - cb * cs,
            BlendMode::Overlay => {
                if cb <= 0.5 {
                    2.0 * cb * cs
                } else {
                    1.0 - 2.0 * (1.0 - cb) * (1.0 - cs)
                }
            }
            BlendMode::Darken => cb.min(cs),
            BlendMode::Lighten => cb.max(cs),
        }
    }
}

/// Converts an 8-bit pixel to unit floats.
#[inline]
pub fn to_unit(p: &[u8]) -> [f32; 4] {
    [
        p[0] as f32 / 255.0,
        p[1] as f32 / 255.0,
        p[2] as f32 / 255.0,
        p[3] as f32 / 255.0,
    ]
}

#[inline]
fn store(dst: &mut [u8], c: [f32; 4]) {
    for i in 0..4 {
        dst[i] = (c[i].clamp(0.0, 1.0) * 255.0).round() as u8;
    }
}

/// Composites a straight-alpha source over the backdrop pixel in place.
///
/// `opacity` multiplies the source alpha. Uses the separable blend
/// formula: `co = as(1-ab)Cs + as*ab*B(Cb,Cs) + (1-as)ab*Cb`.
#[inline]
pub fn composite_pixel(dst: &mut [u8], src: [f32; 4], mode: BlendMode, opacity: f32) {
    let a_s = src[3] * opacity.clamp(0.0, 1.0);
    if a_s <= 0.0 {
        return;
    }
    let b = to_unit(dst);
    let a_b = b[3];
    let a_o = a_s + a_b * (1.0 - a_s);
    let mut out = [0.0, 0.0, 0.0, a_o];
    for i in 0..3 {
        let co = a_s * (1.0 - a_b) * src[i] + a_s * a_b * mode.mix(b[i], src[i]) + (1.0 - a_s) * a_b * b[i];
        out[i] = co / a_o;
    }
    store(dst, out);
}

/// Draws `src` over the whole of `dst` with a blend mode and opacity.
///
/// A source of different dimensions is stretched to cover `dst`.
pub fn composite_image(dst: &mut RgbaImage, src: &RgbaImage, mode: BlendMode, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }
    let (w, h) = dst.dimensions();
    let stretched;
    let src = if src.dimensions() != (w, h) {
        stretched = resize_smooth(src, w, h);
        &stretched
    } else {
        src
    };
    let stride = w as usize * 4;
    dst.par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(drow, srow)| {
            for (d, s) in drow.chunks_exact_mut(4).zip(srow.chunks_exact(4)) {
                composite_pixel(d, to_unit(s), mode, opacity);
            }
        });
}
