//! Memoized texture compositing.

use std::sync::Arc;

use image::RgbaImage;

use super::compositor::{compose_texture, SatelliteImage};
use super::config::TextureConfig;
use crate::geometry::CountrySet;
use crate::pipeline::content_key;

/// Remembers the last composited texture and its input key.
///
/// The compositor is the most expensive derived product, so it only
/// reruns when the config, the country data or a visible satellite
/// image actually changed.
#[derive(Debug, Default)]
pub struct TextureCache {
    entry: Option<(u64, Arc<RgbaImage>)>,
    hits: u64,
    misses: u64,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key over every compositor input. A hidden satellite image does not
    /// influence the output and is left out.
    pub fn key(config: &TextureConfig, countries: &CountrySet, satellite: Option<&SatelliteImage>) -> u64 {
        let config = config.sanitized();
        let sat_revision = match satellite {
            Some(sat) if config.satellite.show => sat.revision(),
            _ => 0,
        };
        content_key(&config, &[countries.revision(), sat_revision])
    }

    /// Returns the cached texture for these inputs, compositing on a miss.
    pub fn get_or_compose(
        &mut self,
        config: &TextureConfig,
        countries: &CountrySet,
        satellite: Option<&SatelliteImage>,
    ) -> Arc<RgbaImage> {
        let key = Self::key(config, countries, satellite);
        if let Some((cached, image)) = &self.entry {
            if *cached == key {
                self.hits += 1;
                tracing::debug!("Texture cache hit ({:016x})", key);
                return Arc::clone(image);
            }
        }
        self.misses += 1;
        tracing::debug!("Texture cache miss ({:016x}), compositing", key);
        let image = Arc::new(compose_texture(config, countries, satellite));
        self.entry = Some((key, Arc::clone(&image)));
        image
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
