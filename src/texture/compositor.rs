//! Layered equirectangular sphere texture.
//!
//! Three passes over one canvas: ocean fill, land fill clipped to the
//! country rings, then the satellite photo under its blend mode.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use image::RgbaImage;

use super::config::{SurfaceLayerConfig, TextureConfig};
use crate::geometry::CountrySet;
use crate::raster::{composite_image, composite_pixel, par_for_each_pixel, BlendMode, CoverageMask, VerticalGradient};

/// A decoded satellite image plus a content hash for cache keys.
#[derive(Debug, Clone)]
pub struct SatelliteImage {
    image: Arc<RgbaImage>,
    revision: u64,
}

impl SatelliteImage {
    pub fn new(image: RgbaImage) -> Self {
        let mut hasher = DefaultHasher::new();
        image.dimensions().hash(&mut hasher);
        image.as_raw().hash(&mut hasher);
        Self {
            image: Arc::new(image),
            revision: hasher.finish(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

fn layer_gradient(layer: &SurfaceLayerConfig, height: u32) -> VerticalGradient {
    VerticalGradient {
        top: layer.color.with_opacity(1.0),
        bottom: layer.bottom_color().with_opacity(1.0),
        height,
    }
}

/// Builds the sphere color map.
///
/// Never fails: an empty country set simply leaves the land pass out,
/// and a missing or hidden satellite image skips the last pass.
pub fn compose_texture(config: &TextureConfig, countries: &CountrySet, satellite: Option<&SatelliteImage>) -> RgbaImage {
    let config = config.sanitized();
    let (width, height) = (config.width, config.height);
    let mut canvas = RgbaImage::new(width, height);

    if config.ocean.paints_fill() {
        let ocean = layer_gradient(&config.ocean, height);
        let opacity = config.ocean.opacity;
        par_for_each_pixel(&mut canvas, |_, y, px| {
            composite_pixel(px, ocean.at_row(y), BlendMode::Normal, opacity);
        });
    }

    if config.land.paints_fill() && !countries.is_empty() {
        let mask = CoverageMask::from_countries(countries, width, height);
        let land = layer_gradient(&config.land, height);
        let opacity = config.land.opacity;
        par_for_each_pixel(&mut canvas, |x, y, px| {
            if mask.get(x, y) {
                composite_pixel(px, land.at_row(y), BlendMode::Normal, opacity);
            }
        });
        tracing::debug!("Land pass covered {} pixels", mask.covered_count());
    }

    match satellite {
        Some(sat) if config.satellite.show => {
            composite_image(&mut canvas, sat.image(), config.satellite.blend_mode, config.satellite.opacity);
        }
        None if config.satellite.show => tracing::debug!("Satellite layer enabled but no image supplied"),
        _ => {}
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::geometry::three_countries;
    use crate::texture::config::{SatelliteLayerConfig, SurfaceStyle};
    use image::Rgba;

    fn small_config() -> TextureConfig {
        TextureConfig {
            width: 360,
            height: 180,
            land: SurfaceLayerConfig {
                color: Rgb::new(255, 0, 0),
                opacity: 1.0,
                ..SurfaceLayerConfig::land()
            },
            ocean: SurfaceLayerConfig {
                color: Rgb::new(0, 0, 255),
                opacity: 1.0,
                ..SurfaceLayerConfig::ocean()
            },
            satellite: SatelliteLayerConfig {
                show: false,
                ..Default::default()
            },
        }
    }

    fn sat() -> SatelliteImage {
        SatelliteImage::new(RgbaImage::from_pixel(64, 32, Rgba([0, 255, 0, 255])))
    }

    #[test]
    fn test_land_clipped_to_countries() {
        let set = three_countries();
        let img = compose_texture(&small_config(), &set, None);
        // lng=0, lat=0 is inside AAA; lng=-150, lat=-60 is ocean.
        assert_eq!(img.get_pixel(180, 90), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(30, 150), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_transparent_land_leaves_pure_ocean() {
        let set = three_countries();
        let mut cfg = small_config();
        cfg.land.opacity = 0.0;
        let img = compose_texture(&cfg, &set, None);
        assert!(img.pixels().all(|p| *p == Rgba([0, 0, 255, 255])));
    }

    #[test]
    fn test_hidden_satellite_matches_absent_satellite() {
        let set = three_countries();
        let cfg = small_config();
        let with = compose_texture(&cfg, &set, Some(&sat()));
        let without = compose_texture(&cfg, &set, None);
        assert_eq!(with, without);
    }

    #[test]
    fn test_satellite_blend_applied() {
        let set = three_countries();
        let mut cfg = small_config();
        cfg.satellite = SatelliteLayerConfig {
            show: true,
            opacity: 1.0,
            blend_mode: BlendMode::Screen,
        };
        let img = compose_texture(&cfg, &set, Some(&sat()));
        // Screen of blue ocean with green photo.
        assert_eq!(img.get_pixel(30, 150), &Rgba([0, 255, 255, 255]));
    }

    #[test]
    fn test_gradient_ocean_and_imagery_land() {
        let mut cfg = small_config();
        cfg.ocean.gradient_enabled = true;
        cfg.ocean.color = Rgb::BLACK;
        cfg.ocean.color2 = Rgb::WHITE;
        cfg.land.style = SurfaceStyle::Imagery;
        let img = compose_texture(&cfg, &three_countries(), None);
        assert!(img.get_pixel(0, 0)[0] < 5);
        assert!(img.get_pixel(0, 179)[0] > 250);
        // No land fill: the country pixel keeps the gradient value.
        assert_eq!(img.get_pixel(180, 90), img.get_pixel(0, 90));
    }

    #[test]
    fn test_empty_country_set_is_ocean_only() {
        let img = compose_texture(&small_config(), &CountrySet::default(), None);
        assert_eq!(img.get_pixel(180, 90), &Rgba([0, 0, 255, 255]));
    }
}
