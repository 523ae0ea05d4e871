//! Country geometry and satellite imagery from disk.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use super::error::LoadError;
use super::progress::{combined_progress, read_with_progress, LoadPhase};
use crate::geometry::{CountrySet, MergeRule};
use crate::texture::SatelliteImage;

fn read_file<F: FnMut(f32)>(path: &Path, phase: LoadPhase, mut on_progress: F) -> Result<Vec<u8>, LoadError> {
    let file = File::open(path)?;
    let total = file.metadata().ok().map(|m| m.len());
    let bytes = read_with_progress(BufReader::new(file), total, |loaded, total| {
        on_progress(combined_progress(phase, loaded, total))
    })?;
    Ok(bytes)
}

/// Loads a GeoJSON country file and applies the merge table.
///
/// `on_progress` receives the combined 0..60 figure.
pub fn load_countries<F: FnMut(f32)>(path: &Path, rules: &[MergeRule], on_progress: F) -> Result<CountrySet, LoadError> {
    let bytes = read_file(path, LoadPhase::Geometry, on_progress)?;
    let text = String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(CountrySet::from_geojson_str(&text, rules)?)
}

/// Loads and decodes an equirectangular satellite image.
///
/// `on_progress` receives the combined 60..100 figure.
pub fn load_satellite<F: FnMut(f32)>(path: &Path, on_progress: F) -> Result<SatelliteImage, LoadError> {
    let bytes = read_file(path, LoadPhase::Imagery, on_progress)?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    let (w, h) = image.dimensions();
    if h == 0 || (w as f32 / h as f32 - 2.0).abs() > 0.1 {
        tracing::warn!("Satellite image is {}x{}, expected a 2:1 equirectangular map", w, h);
    }
    tracing::info!("Loaded satellite image {}x{}", w, h);
    Ok(SatelliteImage::new(image))
}
