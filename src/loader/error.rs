use thiserror::Error;

use crate::geometry::GeometryError;

/// Failures surfaced by the data loaders.
///
/// Callers decide whether to retry; the rest of the scene keeps working
/// with whatever data is already present.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid country geometry: {0}")]
    GeoJson(#[from] GeometryError),
    #[error("Invalid satellite image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid scene config: {0}")]
    Config(#[from] serde_json::Error),
}
