//! Radial depth of field around a focal point.

use image::RgbaImage;

use super::config::{DepthOfFieldConfig, PostProcessingConfig};
use super::processor::{EffectContext, EffectProcessor};
use crate::color::{Rgb, Rgba};
use crate::raster::{composite_pixel, gaussian_blur, par_for_each_pixel, to_unit, BlendMode, RadialGradient};

/// Focal center in percent of the frame, y pointing down.
///
/// A picked focal point is projected through the camera when one is
/// available and in front of it; otherwise the center sits at
/// `(50 %, focus %)`.
pub fn focal_center(dof: &DepthOfFieldConfig, ctx: &EffectContext<'_>) -> (f32, f32) {
    dof.focal_point
        .zip(ctx.projector)
        .and_then(|(p, projector)| projector.screen_position(p.lat, p.lng, 0.0))
        .map(|v| (v.x, v.y))
        .unwrap_or((50.0, dof.focus))
}

/// In-focus and fully blurred radii as percentages of frame height.
pub fn focus_radii(fstop: f32) -> (f32, f32) {
    let inner = (fstop / 2.0).max(0.0);
    let outer = (inner + 10.0).max(fstop);
    (inner, outer)
}

pub struct DepthOfField;

impl EffectProcessor for DepthOfField {
    fn name(&self) -> &'static str {
        "depth_of_field"
    }

    fn is_active(&self, config: &PostProcessingConfig) -> bool {
        let dof = &config.depth_of_field;
        dof.enabled && dof.blur > 0.0 && config.intensity() > 0.0
    }

    fn apply(&self, mut frame: RgbaImage, config: &PostProcessingConfig, ctx: &EffectContext<'_>) -> RgbaImage {
        let dof = &config.depth_of_field;
        let sigma = dof.blur / 5.0 * config.intensity();
        if sigma <= 0.0 {
            return frame;
        }
        let (w, h) = frame.dimensions();
        let (fx, fy) = focal_center(dof, ctx);
        let (inner, outer) = focus_radii(dof.fstop);
        let mask = RadialGradient {
            cx: fx / 100.0 * w as f32,
            cy: fy / 100.0 * h as f32,
            r0: inner / 100.0 * h as f32,
            r1: outer / 100.0 * h as f32,
            inner: Rgba::TRANSPARENT,
            outer: Rgb::BLACK.with_opacity(1.0),
        };

        let blurred = gaussian_blur(&frame, sigma);
        par_for_each_pixel(&mut frame, |x, y, px| {
            let coverage = mask.t_at(x as f32 + 0.5, y as f32 + 0.5);
            if coverage <= 0.0 {
                return;
            }
            let mut src = to_unit(&blurred.get_pixel(x, y).0);
            src[3] *= coverage;
            composite_pixel(px, src, BlendMode::Normal, 1.0);
        });
        frame
    }
}
