//! Blur and resampling wrappers around `image::imageops`.

use image::imageops::{self, FilterType as ResizeFilter};
use image::RgbaImage;
use rayon::prelude::*;

/// Gaussian blur with standard deviation `sigma` pixels.
///
/// A non-positive or non-finite sigma returns an unmodified copy.
pub fn gaussian_blur(img: &RgbaImage, sigma: f32) -> RgbaImage {
    if !(sigma.is_finite() && sigma > 0.0) {
        return img.clone();
    }
    imageops::blur(img, sigma)
}

/// Bilinear resize; used for downsampling and stretching layers.
pub fn resize_smooth(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(img, width.max(1), height.max(1), ResizeFilter::Triangle)
}

/// Lanczos3 resize for supersampled export.
pub fn resize_lanczos(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(img, width.max(1), height.max(1), ResizeFilter::Lanczos3)
}

/// Nearest-neighbor resize; keeps hard pixel edges.
pub fn resize_nearest(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(img, width.max(1), height.max(1), ResizeFilter::Nearest)
}

/// Runs `f(x, y, pixel)` over every pixel, one rayon task per row.
pub fn par_for_each_pixel<F>(img: &mut RgbaImage, f: F)
where
    F: Fn(u32, u32, &mut [u8]) + Sync,
{
    let width = img.width();
    let stride = width as usize * 4;
    if stride == 0 {
        return;
    }
    img.par_chunks_mut(stride).enumerate().for_each(|(y, row)| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            f(x as u32, y as u32, px);
        }
    });
}
