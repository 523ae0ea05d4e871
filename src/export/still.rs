//! Exported stills: supersampling followed by post-processing.

use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::effects::{EffectContext, EffectsCompositor, PostProcessingConfig};
use crate::geometry::{GlobeProjector, OrbitView};
use crate::pipeline::JobSlot;
use crate::raster::resize_lanczos;

/// Largest accepted supersampling factor.
pub const MAX_SUPERSAMPLE: u32 = 4;

/// How a captured frame is turned into the exported still.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Device pixels per layout pixel of the captured frame.
    pub pixel_ratio: f32,
    /// Integer upscale applied before effects.
    pub supersample: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: 2.0,
            supersample: 1,
        }
    }
}

impl ExportOptions {
    pub fn sanitized(&self) -> Self {
        Self {
            pixel_ratio: if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 { self.pixel_ratio } else { 1.0 },
            supersample: self.supersample.clamp(1, MAX_SUPERSAMPLE),
        }
    }
}

/// Upscales the frame by the supersample factor and runs the effects stack.
///
/// Pixel-space effect radii follow the effective pixel ratio, so a
/// supersampled export keeps the look of the live preview.
pub fn export_still(
    frame: RgbaImage,
    effects: &PostProcessingConfig,
    options: &ExportOptions,
    projector: Option<&dyn GlobeProjector>,
) -> RgbaImage {
    let options = options.sanitized();
    let (w, h) = frame.dimensions();
    let frame = if options.supersample > 1 && w > 0 && h > 0 {
        resize_lanczos(&frame, w * options.supersample, h * options.supersample)
    } else {
        frame
    };
    let ctx = EffectContext {
        pixel_ratio: options.pixel_ratio * options.supersample as f32,
        projector,
    };
    EffectsCompositor::new().process(frame, effects, &ctx)
}

/// Runs [`export_still`] on the rayon pool, offering the still to `slot`.
///
/// Starting a newer export through the same slot discards this one's
/// result if it finishes later. Pair with [`JobSlot::wait`].
pub fn spawn_export(
    slot: &Arc<JobSlot<RgbaImage>>,
    frame: RgbaImage,
    effects: PostProcessingConfig,
    options: ExportOptions,
    view: Option<OrbitView>,
) -> u64 {
    slot.spawn(move || {
        let projector = view.as_ref().map(|v| v as &dyn GlobeProjector);
        export_still(frame, &effects, &options, projector)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_supersample_scales_dimensions() {
        let frame = RgbaImage::from_pixel(10, 6, Rgba([40, 80, 120, 255]));
        let options = ExportOptions {
            supersample: 3,
            ..Default::default()
        };
        let out = export_still(frame, &PostProcessingConfig::disabled(), &options, None);
        assert_eq!(out.dimensions(), (30, 18));
        assert_eq!(out.get_pixel(15, 9), &Rgba([40, 80, 120, 255]));
    }

    #[test]
    fn test_no_effects_no_supersample_is_identity() {
        let frame = RgbaImage::from_fn(9, 5, |x, y| Rgba([x as u8 * 20, y as u8 * 40, 0, 255]));
        let out = export_still(frame.clone(), &PostProcessingConfig::default(), &ExportOptions::default(), None);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_newest_background_export_wins() {
        let slot = Arc::new(JobSlot::new());
        let small = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let large = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        let options = ExportOptions::default();
        let first = spawn_export(&slot, small, PostProcessingConfig::cinematic(), options, None);
        let second = spawn_export(&slot, large, PostProcessingConfig::disabled(), options, Some(OrbitView::default()));
        assert!(second > first);
        let still = slot.wait(second).unwrap();
        assert_eq!(still.dimensions(), (8, 8));
        assert_eq!(still.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(slot.wait(first), None);
    }

    #[test]
    fn test_sanitized_limits() {
        let o = ExportOptions {
            pixel_ratio: f32::NAN,
            supersample: 99,
        }
        .sanitized();
        assert_eq!((o.pixel_ratio, o.supersample), (1.0, MAX_SUPERSAMPLE));
    }
}
