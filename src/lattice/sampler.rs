//! Golden-angle spiral sampling of lattice strata.

use std::f64::consts::PI;

use glam::{EulerRot, Quat, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::cell::CellShapeKey;
use super::config::{GradientAxis, LatticeStratum};
use crate::color::Rgb;
use crate::geometry::{globe_position, CountrySet, GeoPoint};

/// Lift applied on top of a stratum's altitude so cells clear the surface.
pub const SURFACE_LIFT: f64 = 0.002;

/// Visual parameters a point inherits from its stratum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub color: Rgb,
    pub color2: Rgb,
    pub gradient_enabled: bool,
    pub gradient_axis: GradientAxis,
    pub opacity: f32,
    pub segments: u32,
    pub gap: f32,
}

impl CellStyle {
    fn from_stratum(s: &LatticeStratum) -> Self {
        Self {
            color: s.color,
            color2: s.color2,
            gradient_enabled: s.gradient_enabled,
            gradient_axis: s.gradient_axis,
            opacity: s.opacity,
            segments: s.segments,
            gap: s.gap,
        }
    }
}

/// One placed lattice cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticePoint {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
    pub shape: CellShapeKey,
    pub style: CellStyle,
    /// World position after the stratum rotation.
    pub position: Vec3,
    /// Rotation taking the cell's local +Y onto the outward direction.
    pub orientation: Quat,
}

/// Points produced for one stratum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeLayer {
    pub stratum_id: String,
    pub points: Vec<LatticePoint>,
}

/// Sample `i` of `n` on the golden-angle spiral.
///
/// `y` runs from +1 (north pole) to -1; a single sample sits at the
/// north pole.
pub fn spiral_point(i: usize, n: usize) -> GeoPoint {
    let golden_angle = PI * (3.0 - 5f64.sqrt());
    let y = if n > 1 {
        (1.0 - (i as f64 / (n - 1) as f64) * 2.0).clamp(-1.0, 1.0)
    } else {
        1.0
    };
    let radius = (1.0 - y * y).max(0.0).sqrt();
    let theta = golden_angle * i as f64;
    let lat = y.asin().to_degrees();
    let lng = (theta.sin() * radius).atan2(theta.cos() * radius).to_degrees();
    GeoPoint::new(lat, lng)
}

/// Places a cell: globe position, stratum rotation, outward orientation.
fn place(lat: f64, lng: f64, altitude: f64, rotation: Quat) -> (Vec3, Quat) {
    let position = rotation * globe_position(lat, lng, altitude);
    let outward = position.try_normalize().unwrap_or(Vec3::Y);
    (position, Quat::from_rotation_arc(Vec3::Y, outward))
}

/// Samples one stratum.
///
/// With `show_sea` off, samples not on land are dropped and not
/// replaced, so the result holds at most `density` points. When country
/// data is not available yet such a stratum yields nothing.
pub fn sample_stratum(stratum: &LatticeStratum, countries: Option<&CountrySet>) -> Vec<LatticePoint> {
    let stratum = stratum.sanitized();
    if !stratum.is_sampled() {
        return Vec::new();
    }
    let land = match (stratum.show_sea, countries) {
        (true, _) => None,
        (false, Some(set)) => Some(set),
        (false, None) => {
            tracing::debug!("Stratum {} excludes ocean but no country data is loaded", stratum.id);
            return Vec::new();
        }
    };

    let n = stratum.density as usize;
    let altitude = stratum.altitude as f64 + SURFACE_LIFT;
    let [rx, ry, rz] = stratum.rotation;
    let rotation = Quat::from_euler(EulerRot::XYZ, rx.to_radians(), ry.to_radians(), rz.to_radians());
    let shape = CellShapeKey::for_stratum(&stratum);
    let style = CellStyle::from_stratum(&stratum);

    let points: Vec<LatticePoint> = (0..n)
        .into_par_iter()
        .filter_map(|i| {
            let p = spiral_point(i, n);
            if let Some(set) = land {
                if !set.is_on_land(p.lng, p.lat) {
                    return None;
                }
            }
            let (position, orientation) = place(p.lat, p.lng, altitude, rotation);
            Some(LatticePoint {
                lat: p.lat,
                lng: p.lng,
                altitude,
                shape,
                style: style.clone(),
                position,
                orientation,
            })
        })
        .collect();

    tracing::debug!("Stratum {}: {} of {} samples kept", stratum.id, points.len(), n);
    points
}

/// Samples every stratum that produces points, in configuration order.
pub fn sample_strata(strata: &[LatticeStratum], countries: Option<&CountrySet>) -> Vec<LatticeLayer> {
    strata
        .iter()
        .filter(|s| s.is_sampled())
        .map(|s| LatticeLayer {
            stratum_id: s.id.clone(),
            points: sample_stratum(s, countries),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::three_countries;
    use crate::lattice::config::FillMode;

    fn land_only(density: u32) -> LatticeStratum {
        LatticeStratum {
            show_sea: false,
            ..LatticeStratum::hex_grid("L", density)
        }
    }

    #[test]
    fn test_spiral_endpoints() {
        let first = spiral_point(0, 100);
        let last = spiral_point(99, 100);
        assert!((first.lat - 90.0).abs() < 1e-9);
        assert!((last.lat + 90.0).abs() < 1e-9);
        let single = spiral_point(0, 1);
        assert_eq!((single.lat, single.lng), (90.0, 0.0));
    }

    #[test]
    fn test_spiral_quasi_uniform() {
        // Hemisphere split and a mid-latitude band get their area share.
        let n = 2000;
        let pts: Vec<GeoPoint> = (0..n).map(|i| spiral_point(i, n)).collect();
        let north = pts.iter().filter(|p| p.lat > 0.0).count();
        assert!((north as i64 - 1000).abs() <= 2);
        let east = pts.iter().filter(|p| p.lng > 0.0).count();
        assert!((east as i64 - 1000).abs() <= 20);
        let polar_cap = pts.iter().filter(|p| p.lat > 60.0).count() as f64 / n as f64;
        let expected = (1.0 - 60f64.to_radians().sin()) / 2.0;
        assert!((polar_cap - expected).abs() < 0.01);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let set = three_countries();
        let s = land_only(1500);
        assert_eq!(sample_stratum(&s, Some(&set)), sample_stratum(&s, Some(&set)));
        let sea = LatticeStratum {
            show_sea: true,
            ..s
        };
        assert_eq!(sample_stratum(&sea, None), sample_stratum(&sea, None));
    }

    #[test]
    fn test_ocean_exclusion_with_three_countries() {
        let set = three_countries();
        let points = sample_stratum(&land_only(1000), Some(&set));
        assert!(points.len() <= 1000);
        assert!(!points.is_empty());
        let false_positives = points.iter().filter(|p| !set.is_on_land(p.lng, p.lat)).count();
        assert_eq!(false_positives, 0);
        // Re-check against the raw rings, bypassing the bbox index.
        for p in &points {
            assert!(set.countries().iter().any(|c| c.rings().iter().any(|r| crate::geometry::ring_contains(r, p.lng, p.lat))));
        }
    }

    #[test]
    fn test_show_sea_keeps_full_quota() {
        let s = LatticeStratum {
            show_sea: true,
            ..LatticeStratum::dots("D", 321)
        };
        let points = sample_stratum(&s, Some(&three_countries()));
        assert_eq!(points.len(), 321);
        assert_eq!(points[0].shape, CellShapeKey::dot(0.05));
    }

    #[test]
    fn test_exclusion_without_geometry_yields_nothing() {
        assert!(sample_stratum(&land_only(100), None).is_empty());
        assert!(sample_stratum(&land_only(100), Some(&CountrySet::default())).is_empty());
    }

    #[test]
    fn test_altitude_lift_and_orientation() {
        let s = LatticeStratum {
            show_sea: true,
            altitude: 0.5,
            ..LatticeStratum::hex_grid("A", 10)
        };
        let points = sample_stratum(&s, None);
        for p in &points {
            assert!((p.altitude - 0.502).abs() < 1e-6);
            let up = p.orientation * Vec3::Y;
            assert!((up - p.position.normalize()).length() < 1e-4);
            assert!((p.position.length() - 150.2).abs() < 1e-2);
        }
    }

    #[test]
    fn test_rotation_moves_positions() {
        let base = LatticeStratum {
            show_sea: true,
            ..LatticeStratum::hex_grid("A", 10)
        };
        let rotated = LatticeStratum {
            rotation: [0.0, 90.0, 0.0],
            ..base.clone()
        };
        let a = sample_stratum(&base, None);
        let b = sample_stratum(&rotated, None);
        // Same geographic samples, different world placement.
        assert_eq!((a[3].lat, a[3].lng), (b[3].lat, b[3].lng));
        assert!((a[3].position - b[3].position).length() > 1.0);
        let expected = Quat::from_rotation_y(90f32.to_radians()) * a[3].position;
        assert!((expected - b[3].position).length() < 1e-3);
    }

    #[test]
    fn test_strata_filtering_and_order() {
        let strata = vec![
            LatticeStratum { show_sea: true, ..LatticeStratum::hex_grid("A", 5) },
            LatticeStratum { fill_mode: FillMode::Color, ..LatticeStratum::hex_grid("B", 5) },
            LatticeStratum { show_sea: true, ..LatticeStratum::dots("C", 7) },
        ];
        let layers = sample_strata(&strata, None);
        let ids: Vec<&str> = layers.iter().map(|l| l.stratum_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(layers[1].points.len(), 7);
    }
}
