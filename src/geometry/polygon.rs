//! Country polygons in longitude/latitude space.

use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A closed ring of `[lng, lat]` vertices.
pub type Ring = Vec<[f64; 2]>;

/// Axis-aligned bounding box in lon/lat space. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    /// An inverted box that any `include` call will replace.
    pub const EMPTY: GeoBounds = GeoBounds {
        min_lng: f64::INFINITY,
        min_lat: f64::INFINITY,
        max_lng: f64::NEG_INFINITY,
        max_lat: f64::NEG_INFINITY,
    };

    /// Computes the box enclosing every vertex of every ring.
    pub fn from_rings(rings: &[Ring]) -> Self {
        let mut bounds = Self::EMPTY;
        for ring in rings {
            for &[lng, lat] in ring {
                bounds.include(lng, lat);
            }
        }
        bounds
    }

    fn include(&mut self, lng: f64, lat: f64) {
        self.min_lng = self.min_lng.min(lng);
        self.max_lng = self.max_lng.max(lng);
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
    }

    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        lng >= self.min_lng && lng <= self.max_lng && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Latitude of the box's vertical midpoint.
    pub fn mid_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }
}

/// Even-odd ray casting test of `(lng, lat)` against one ring.
///
/// The ring may or may not repeat its first vertex at the end.
pub fn ring_contains(ring: &[[f64; 2]], lng: f64, lat: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > lat) != (yj > lat) && lng < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Returns true when a ring has at least three distinct finite vertices.
fn ring_is_usable(ring: &[[f64; 2]]) -> bool {
    if ring.iter().any(|[x, y]| !x.is_finite() || !y.is_finite()) {
        return false;
    }
    let mut distinct: Vec<[f64; 2]> = Vec::with_capacity(ring.len());
    for v in ring {
        if !distinct.contains(v) {
            distinct.push(*v);
            if distinct.len() >= 3 {
                return true;
            }
        }
    }
    false
}

/// One country's outline: an ISO code and its outer rings.
///
/// Fields are private so the cached bounding box can never drift from
/// the ring data.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryPolygon {
    code: String,
    rings: Vec<Ring>,
    bounds: GeoBounds,
}

impl CountryPolygon {
    /// Builds a polygon, dropping malformed rings.
    ///
    /// Returns `None` when no usable ring remains.
    pub fn new(code: impl Into<String>, rings: Vec<Ring>) -> Option<Self> {
        let code = code.into();
        let total = rings.len();
        let rings: Vec<Ring> = rings.into_iter().filter(|r| ring_is_usable(r)).collect();
        if rings.len() < total {
            tracing::warn!(
                "Country {}: skipped {} malformed ring(s)",
                code,
                total - rings.len()
            );
        }
        if rings.is_empty() {
            return None;
        }
        let bounds = GeoBounds::from_rings(&rings);
        Some(Self { code, rings, bounds })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// True if the point lies inside any ring of this country.
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        self.bounds.contains(lng, lat) && self.rings.iter().any(|r| ring_contains(r, lng, lat))
    }

    /// Arithmetic mean of the first ring's vertices.
    ///
    /// A cheap stand-in for a true spherical centroid; good enough for
    /// placing an arc endpoint.
    pub fn first_ring_centroid(&self) -> GeoPoint {
        let ring = &self.rings[0];
        let (sx, sy) = ring
            .iter()
            .fold((0.0, 0.0), |(sx, sy), [x, y]| (sx + x, sy + y));
        let n = ring.len() as f64;
        GeoPoint::new(sy / n, sx / n)
    }

    /// Appends another country's rings to this one and refreshes the bounds.
    pub(crate) fn absorb(&mut self, other: CountryPolygon) {
        self.rings.extend(other.rings);
        self.bounds = GeoBounds::from_rings(&self.rings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Ring {
        vec![[min, min], [max, min], [max, max], [min, max], [min, min]]
    }

    #[test]
    fn test_ring_contains_square() {
        let ring = square(-10.0, 10.0);
        assert!(ring_contains(&ring, 0.0, 0.0));
        assert!(ring_contains(&ring, 9.9, -9.9));
        assert!(!ring_contains(&ring, 10.5, 0.0));
        assert!(!ring_contains(&ring, 0.0, -11.0));
    }

    #[test]
    fn test_ring_contains_concave() {
        // U shape opening upward; the notch is outside.
        let ring = vec![[0.0, 0.0], [6.0, 0.0], [6.0, 6.0], [4.0, 6.0], [4.0, 2.0], [2.0, 2.0], [2.0, 6.0], [0.0, 6.0]];
        assert!(ring_contains(&ring, 1.0, 4.0));
        assert!(ring_contains(&ring, 5.0, 4.0));
        assert!(!ring_contains(&ring, 3.0, 4.0));
        assert!(ring_contains(&ring, 3.0, 1.0));
    }

    #[test]
    fn test_bounds_follow_rings() {
        let poly = CountryPolygon::new("AAA", vec![square(-10.0, 10.0), square(20.0, 25.0)]).unwrap();
        let b = poly.bounds();
        assert_eq!((b.min_lng, b.min_lat, b.max_lng, b.max_lat), (-10.0, -10.0, 25.0, 25.0));
    }

    #[test]
    fn test_malformed_rings_are_dropped() {
        let degenerate = vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
        let poly = CountryPolygon::new("AAA", vec![degenerate.clone(), square(0.0, 1.0)]).unwrap();
        assert_eq!(poly.rings().len(), 1);
        assert!(CountryPolygon::new("BBB", vec![degenerate]).is_none());
        assert!(CountryPolygon::new("CCC", vec![vec![[f64::NAN, 0.0], [1.0, 0.0], [1.0, 1.0]]]).is_none());
    }

    #[test]
    fn test_absorb_recomputes_bounds() {
        let mut a = CountryPolygon::new("AAA", vec![square(0.0, 1.0)]).unwrap();
        let b = CountryPolygon::new("BBB", vec![square(5.0, 6.0)]).unwrap();
        a.absorb(b);
        assert_eq!(a.rings().len(), 2);
        assert_eq!(a.bounds().max_lng, 6.0);
        assert!(a.contains(5.5, 5.5));
    }

    #[test]
    fn test_first_ring_centroid_is_vertex_mean() {
        let poly = CountryPolygon::new("AAA", vec![vec![[0.0, 0.0], [4.0, 0.0], [4.0, 2.0], [0.0, 2.0]]]).unwrap();
        let c = poly.first_ring_centroid();
        assert_eq!((c.lat, c.lng), (1.0, 2.0));
    }
}
