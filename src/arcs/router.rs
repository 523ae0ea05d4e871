//! Arc bundle synthesis.

use serde::{Deserialize, Serialize};

use super::config::{
    ArcColor, ArcDistribution, ArcGroup, ArcStyle, BundleConfig, DashPattern, RandomArcConfig, MIN_ARC_ALTITUDE,
};
use super::hubs::resolve_hub;
use crate::geometry::{CountrySet, GeoPoint};

/// One renderable arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub altitude: f64,
    pub color: ArcColor,
}

/// The full arc list with its shared presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcLayer {
    pub segments: Vec<ArcSegment>,
    pub dash: DashPattern,
    pub thickness: f32,
    pub animate_ms: u32,
}

/// Index pair for random arc `j` over `len` countries.
///
/// Depends only on `j` and `len`, so raising the count appends arcs
/// without moving earlier ones.
pub fn random_pair(j: u64, len: u64) -> (usize, usize) {
    (
        ((j * 9301 + 49297) % len) as usize,
        ((j * 49297 + 9301) % len) as usize,
    )
}

/// Signed offset of bundle member `i`, symmetric about the midline.
pub fn bundle_offset(i: u32, bundle_size: u32, spacing: f64) -> f64 {
    let mid = (bundle_size.max(1) - 1) as f64 / 2.0;
    (i as f64 - mid) * spacing
}

/// Expands one hub pair into `bundle_size` arcs.
pub fn bundle(start: GeoPoint, end: GeoPoint, config: &BundleConfig, color: ArcColor) -> Vec<ArcSegment> {
    let config = config.sanitized();
    let d_lat = end.lat - start.lat;
    let d_lng = end.lng - start.lng;
    let mut dist = (d_lat * d_lat + d_lng * d_lng).sqrt();
    if dist == 0.0 {
        dist = 1.0;
    }
    // Unit perpendicular to the chord in lat/lng space.
    let (p_lat, p_lng) = (-d_lng / dist, d_lat / dist);

    (0..config.bundle_size)
        .map(|i| {
            let offset = bundle_offset(i, config.bundle_size, config.spacing);
            let mut seg = ArcSegment {
                start_lat: start.lat,
                start_lng: start.lng,
                end_lat: end.lat,
                end_lng: end.lng,
                altitude: config.curvature,
                color,
            };
            match config.distribution {
                ArcDistribution::Horizontal => {
                    seg.start_lat += offset * p_lat;
                    seg.start_lng += offset * p_lng;
                    seg.end_lat += offset * p_lat;
                    seg.end_lng += offset * p_lng;
                }
                ArcDistribution::Vertical => seg.altitude += offset * 0.5,
            }
            seg.altitude = seg.altitude.max(MIN_ARC_ALTITUDE);
            seg
        })
        .collect()
}

/// Builds the merged arc list: random pairs first, then explicit groups.
///
/// Pairs whose hubs cannot be resolved are skipped. Without country
/// data the list is empty.
pub fn route_arcs(random: &RandomArcConfig, groups: &[ArcGroup], style: &ArcStyle, countries: &CountrySet) -> ArcLayer {
    let style = style.sanitized();
    let color = style.resolve_color();
    let mut segments = Vec::new();

    if countries.is_empty() {
        tracing::debug!("No country data; arc list left empty");
    } else {
        let random = random.sanitized();
        if random.visible {
            let list = countries.countries();
            let len = list.len() as u64;
            for j in 0..random.count as u64 {
                let (a, b) = random_pair(j, len);
                if a == b {
                    continue;
                }
                let hubs = resolve_hub(list[a].code(), countries).zip(resolve_hub(list[b].code(), countries));
                if let Some((h1, h2)) = hubs {
                    segments.extend(bundle(h1, h2, &random.bundle, color));
                }
            }
        }

        for group in groups.iter().filter(|g| g.visible) {
            match (resolve_hub(&group.start, countries), resolve_hub(&group.end, countries)) {
                (Some(h1), Some(h2)) => segments.extend(bundle(h1, h2, &group.bundle, color)),
                _ => tracing::warn!("Arc group {}: unresolvable hub {} or {}", group.id, group.start, group.end),
            }
        }
    }

    ArcLayer {
        segments,
        dash: style.dash_pattern(),
        thickness: style.thickness,
        animate_ms: style.animate_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{three_countries, CountryPolygon};

    /// The index hash needs more than four countries to avoid collisions.
    fn five_countries() -> CountrySet {
        let mut list = three_countries().countries().to_vec();
        for (code, cx, cy) in [("DDD", -60.0, 0.0), ("EEE", 0.0, -45.0)] {
            let ring = vec![[cx - 5.0, cy - 5.0], [cx + 5.0, cy - 5.0], [cx + 5.0, cy + 5.0], [cx - 5.0, cy + 5.0]];
            list.push(CountryPolygon::new(code, vec![ring]).unwrap());
        }
        CountrySet::new(list)
    }

    fn endpoints(layer: &ArcLayer) -> Vec<(f64, f64, f64, f64)> {
        layer
            .segments
            .iter()
            .map(|s| (s.start_lat, s.start_lng, s.end_lat, s.end_lng))
            .collect()
    }

    fn random(count: u32, bundle_size: u32) -> RandomArcConfig {
        RandomArcConfig {
            visible: true,
            count,
            bundle: BundleConfig {
                bundle_size,
                spacing: 1.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_random_arcs_are_deterministic() {
        let set = five_countries();
        let style = ArcStyle::default();
        let a = route_arcs(&random(12, 3), &[], &style, &set);
        let b = route_arcs(&random(12, 3), &[], &style, &set);
        assert!(!a.segments.is_empty());
        assert_eq!(endpoints(&a), endpoints(&b));
    }

    #[test]
    fn test_raising_count_keeps_prefix() {
        let set = five_countries();
        let style = ArcStyle::default();
        let short = route_arcs(&random(5, 2), &[], &style, &set);
        let long = route_arcs(&random(9, 2), &[], &style, &set);
        let (s, l) = (endpoints(&short), endpoints(&long));
        assert!(l.len() > s.len());
        assert_eq!(&l[..s.len()], &s[..]);
    }

    #[test]
    fn test_colliding_indices_skipped() {
        // With one country every pair collides.
        let set = CountrySet::new(vec![three_countries().countries()[0].clone()]);
        let layer = route_arcs(&random(10, 1), &[], &ArcStyle::default(), &set);
        assert!(layer.segments.is_empty());
    }

    #[test]
    fn test_odd_bundle_symmetry() {
        let start = GeoPoint::new(0.0, 0.0);
        let end = GeoPoint::new(30.0, 40.0);
        let cfg = BundleConfig {
            bundle_size: 5,
            spacing: 2.0,
            ..Default::default()
        };
        let arcs = bundle(start, end, &cfg, ArcStyle::default().resolve_color());
        assert_eq!(arcs.len(), 5);
        let mid = &arcs[2];
        assert_eq!((mid.start_lat, mid.start_lng, mid.end_lat, mid.end_lng), (0.0, 0.0, 30.0, 40.0));
        for k in 0..2 {
            let (lo, hi) = (&arcs[k], &arcs[4 - k]);
            assert!((lo.start_lat + hi.start_lat).abs() < 1e-9);
            assert!((lo.start_lng + hi.start_lng).abs() < 1e-9);
        }
        // Perpendicular to the chord, at the configured spacing.
        let d = (arcs[3].start_lat - arcs[2].start_lat, arcs[3].start_lng - arcs[2].start_lng);
        assert!((d.0 * 30.0 + d.1 * 40.0).abs() < 1e-9);
        assert!(((d.0 * d.0 + d.1 * d.1).sqrt() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_bundle_and_altitude_floor() {
        let cfg = BundleConfig {
            bundle_size: 3,
            distribution: ArcDistribution::Vertical,
            spacing: 0.4,
            curvature: 0.1,
        };
        let arcs = bundle(GeoPoint::new(0.0, 0.0), GeoPoint::new(10.0, 10.0), &cfg, ArcStyle::default().resolve_color());
        let alts: Vec<f64> = arcs.iter().map(|a| a.altitude).collect();
        assert_eq!(alts[0], MIN_ARC_ALTITUDE);
        assert!((alts[1] - 0.1).abs() < 1e-12);
        assert!((alts[2] - 0.3).abs() < 1e-12);
        assert!(arcs.iter().all(|a| a.start_lat == 0.0 && a.end_lng == 10.0));
    }

    #[test]
    fn test_coincident_hubs_use_unit_distance() {
        let p = GeoPoint::new(5.0, 5.0);
        let arcs = bundle(p, p, &BundleConfig { bundle_size: 2, spacing: 1.0, ..Default::default() }, ArcStyle::default().resolve_color());
        assert!(arcs.iter().all(|a| a.start_lat.is_finite() && a.start_lng.is_finite()));
    }

    #[test]
    fn test_groups_follow_random_arcs() {
        let set = three_countries();
        let groups = vec![
            ArcGroup::new("g1", "AAA", "USA"),
            ArcGroup {
                visible: false,
                ..ArcGroup::new("g2", "AAA", "BBB")
            },
            ArcGroup::new("g3", "AAA", "NOPE"),
        ];
        let hidden_random = RandomArcConfig {
            visible: false,
            ..Default::default()
        };
        let layer = route_arcs(&hidden_random, &groups, &ArcStyle::default(), &set);
        assert_eq!(layer.segments.len(), 1);
        let usa = layer.segments[0];
        assert_eq!((usa.end_lat, usa.end_lng), (38.9072, -77.0369));
        assert!((layer.dash.length - 0.0234).abs() < 1e-6);
    }

    #[test]
    fn test_empty_country_set_gives_no_arcs() {
        let layer = route_arcs(&random(5, 1), &[ArcGroup::new("g", "USA", "CHN")], &ArcStyle::default(), &CountrySet::default());
        assert!(layer.segments.is_empty());
    }
}
