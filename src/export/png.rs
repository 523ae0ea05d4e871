//! PNG encoding for sphere maps and exported stills.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageEncoder, RgbaImage};
use thiserror::Error;

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cannot export an empty {0}x{1} image")]
    EmptyImage(u32, u32),
}

/// PNG codec settings.
#[derive(Debug, Clone, Copy)]
pub struct PngOptions {
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngOptions {
    /// Quick encode for previews and intermediate files.
    pub fn fast() -> Self {
        Self {
            compression: CompressionType::Fast,
            filter: FilterType::NoFilter,
        }
    }

    /// Smallest files, slowest encode.
    pub fn best() -> Self {
        Self {
            compression: CompressionType::Best,
            filter: FilterType::Adaptive,
        }
    }
}

/// Encodes an RGBA image as 8-bit PNG into any writer.
pub fn encode_png<W: Write>(image: &RgbaImage, writer: W, options: &PngOptions) -> Result<(), ExportError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage(width, height));
    }
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(image.as_raw(), width, height, image::ExtendedColorType::Rgba8)?;
    Ok(())
}

/// Writes an RGBA image to a PNG file, creating parent directories.
pub fn write_png(image: &RgbaImage, path: &Path, options: &PngOptions) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    encode_png(image, &mut writer, options)?;
    writer.flush()?;
    tracing::info!("Wrote {}x{} PNG to {}", image.width(), image.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(16, 8, |x, y| Rgba([(x * 16) as u8, (y * 32) as u8, 7, if x < 8 { 255 } else { 128 }]))
    }

    #[test]
    fn test_encode_decodes_back() {
        let mut bytes = Vec::new();
        encode_png(&sample(), &mut bytes, &PngOptions::default()).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_write_png_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/map.png");
        write_png(&sample(), &path, &PngOptions::fast()).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 8));
    }

    #[test]
    fn test_empty_image_rejected() {
        let mut bytes = Vec::new();
        let err = encode_png(&RgbaImage::new(0, 4), &mut bytes, &PngOptions::best()).unwrap_err();
        assert!(matches!(err, ExportError::EmptyImage(0, 4)));
    }
}
