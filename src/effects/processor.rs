//! Effect processor trait and the fixed-order compositor.

use image::RgbaImage;

use super::bloom::Bloom;
use super::chromatic::ChromaticAberration;
use super::color_grade::ColorGrade;
use super::config::PostProcessingConfig;
use super::depth_of_field::DepthOfField;
use super::mosaic::Mosaic;
use super::noise::FilmNoise;
use super::vignette::Vignette;
use crate::geometry::GlobeProjector;

/// Frame-independent inputs shared by every processor.
#[derive(Clone, Copy)]
pub struct EffectContext<'a> {
    /// Device pixels per layout pixel of the captured frame.
    pub pixel_ratio: f32,
    /// Camera used to track the depth-of-field focal point.
    pub projector: Option<&'a dyn GlobeProjector>,
}

impl Default for EffectContext<'_> {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            projector: None,
        }
    }
}

impl<'a> EffectContext<'a> {
    pub fn with_projector(projector: &'a dyn GlobeProjector) -> Self {
        Self {
            projector: Some(projector),
            ..Default::default()
        }
    }
}

/// One post-processing effect.
///
/// Processors receive an already sanitized config. `apply` must treat
/// degenerate parameters as a no-op and never fail.
pub trait EffectProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the effect would change the frame at all.
    fn is_active(&self, config: &PostProcessingConfig) -> bool;

    fn apply(&self, frame: RgbaImage, config: &PostProcessingConfig, ctx: &EffectContext<'_>) -> RgbaImage;
}

/// Folds a frame through enabled processors in a fixed order.
pub struct EffectsCompositor {
    processors: Vec<Box<dyn EffectProcessor>>,
}

impl Default for EffectsCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectsCompositor {
    /// Color grading, bloom, depth of field, mosaic, chromatic
    /// aberration, then the vignette and noise overlays.
    pub fn new() -> Self {
        Self::with_processors(vec![
            Box::new(ColorGrade),
            Box::new(Bloom),
            Box::new(DepthOfField),
            Box::new(Mosaic),
            Box::new(ChromaticAberration),
            Box::new(Vignette),
            Box::new(FilmNoise),
        ])
    }

    pub fn with_processors(processors: Vec<Box<dyn EffectProcessor>>) -> Self {
        Self { processors }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Names of the processors a pass over `config` would run.
    pub fn active_names(&self, config: &PostProcessingConfig) -> Vec<&'static str> {
        let config = config.sanitized();
        if !config.enabled {
            return Vec::new();
        }
        self.processors
            .iter()
            .filter(|p| p.is_active(&config))
            .map(|p| p.name())
            .collect()
    }

    pub fn process(&self, frame: RgbaImage, config: &PostProcessingConfig, ctx: &EffectContext<'_>) -> RgbaImage {
        let config = config.sanitized();
        if !config.enabled || frame.width() == 0 || frame.height() == 0 {
            return frame;
        }
        self.processors
            .iter()
            .filter(|p| p.is_active(&config))
            .fold(frame, |frame, p| {
                tracing::debug!("Applying effect: {}", p.name());
                p.apply(frame, &config, ctx)
            })
    }
}
