//! Scanline coverage mask built from country rings.
//!
//! Each ring is filled with the even-odd rule at pixel centers and the
//! rings are OR-ed together, which matches the point-in-polygon land
//! test used by the lattice sampler.

use rayon::prelude::*;

use crate::geometry::{equirect_pixel, CountrySet};

/// One bit per pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

/// A ring projected to pixel space with its vertical extent.
struct PixelRing {
    points: Vec<(f64, f64)>,
    min_y: f64,
    max_y: f64,
}

impl PixelRing {
    fn new(points: Vec<(f64, f64)>) -> Self {
        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
        Self { points, min_y, max_y }
    }

    /// X coordinates where the horizontal line at `yc` crosses the ring.
    fn crossings(&self, yc: f64, out: &mut Vec<f64>) {
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.points[i];
            let (xj, yj) = self.points[j];
            if (yi > yc) != (yj > yc) {
                out.push(xi + (yc - yi) * (xj - xi) / (yj - yi));
            }
            j = i;
        }
    }
}

impl CoverageMask {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Rasterizes the union of every country ring at `width` × `height`.
    pub fn from_countries(countries: &CountrySet, width: u32, height: u32) -> Self {
        let rings: Vec<PixelRing> = countries
            .countries()
            .iter()
            .flat_map(|c| c.rings())
            .filter(|r| r.len() >= 3)
            .map(|r| {
                PixelRing::new(
                    r.iter()
                        .map(|&[lng, lat]| equirect_pixel(lng, lat, width, height))
                        .collect(),
                )
            })
            .collect();
        Self::from_pixel_rings(&rings, width, height)
    }

    fn from_pixel_rings(rings: &[PixelRing], width: u32, height: u32) -> Self {
        let mut mask = Self::empty(width, height);
        if width == 0 || height == 0 {
            return mask;
        }
        mask.bits
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let yc = y as f64 + 0.5;
                let mut xs = Vec::new();
                for ring in rings.iter().filter(|r| yc >= r.min_y && yc <= r.max_y) {
                    xs.clear();
                    ring.crossings(yc, &mut xs);
                    xs.sort_by(f64::total_cmp);
                    for span in xs.chunks_exact(2) {
                        // Pixels whose centers fall inside [x0, x1).
                        let start = (span[0] - 0.5).ceil().max(0.0) as usize;
                        let end = ((span[1] - 0.5).ceil().max(0.0) as usize).min(row.len());
                        for bit in row.iter_mut().take(end).skip(start) {
                            *bit = true;
                        }
                    }
                }
            });
        mask
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[y as usize * self.width as usize + x as usize]
    }

    pub fn covered_count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::three_countries;

    #[test]
    fn test_mask_matches_point_in_polygon() {
        let set = three_countries();
        let (w, h) = (360, 180);
        let mask = CoverageMask::from_countries(&set, w, h);
        assert!(mask.covered_count() > 0);
        for y in 0..h {
            for x in 0..w {
                let lng = (x as f64 + 0.5) - 180.0;
                let lat = 90.0 - (y as f64 + 0.5);
                assert_eq!(mask.get(x, y), set.is_on_land(lng, lat), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_square_area() {
        let set = three_countries();
        let mask = CoverageMask::from_countries(&set, 360, 180);
        // Three 20x20 degree squares at one pixel per degree.
        assert_eq!(mask.covered_count(), 3 * 400);
    }

    #[test]
    fn test_empty_set_and_zero_size() {
        let mask = CoverageMask::from_countries(&CountrySet::default(), 16, 8);
        assert_eq!(mask.covered_count(), 0);
        let zero = CoverageMask::from_countries(&three_countries(), 0, 0);
        assert!(!zero.get(0, 0));
    }
}
