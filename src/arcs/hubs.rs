//! Hub coordinates: where a country's arcs start and end.

use crate::geometry::{CountrySet, GeoPoint};

/// Curated capital-city coordinates `(code, lat, lng)`.
const CAPITALS: [(&str, f64, f64); 20] = [
    ("CHN", 39.9042, 116.4074),
    ("USA", 38.9072, -77.0369),
    ("GBR", 51.5074, -0.1276),
    ("FRA", 48.8566, 2.3522),
    ("DEU", 52.5200, 13.4050),
    ("JPN", 35.6762, 139.6503),
    ("RUS", 55.7558, 37.6173),
    ("IND", 28.6139, 77.2090),
    ("BRA", -15.7975, -47.8919),
    ("CAN", 45.4215, -75.6972),
    ("AUS", -35.2809, 149.1300),
    ("ITA", 41.9028, 12.4964),
    ("ESP", 40.4168, -3.7038),
    ("KOR", 37.5665, 126.9780),
    ("SGP", 1.3521, 103.8198),
    ("SAU", 24.7136, 46.6753),
    ("TUR", 39.9334, 32.8597),
    ("EGY", 30.0444, 31.2357),
    ("ZAF", -25.7479, 28.2293),
    ("ARG", -34.6037, -58.3816),
];

/// Capital coordinate for a country code, if curated.
pub fn capital(code: &str) -> Option<GeoPoint> {
    CAPITALS
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(_, lat, lng)| GeoPoint::new(lat, lng))
}

/// Capital first, then the vertex mean of the country's first ring.
pub fn resolve_hub(code: &str, countries: &CountrySet) -> Option<GeoPoint> {
    capital(code).or_else(|| countries.get(code).map(|c| c.first_ring_centroid()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::three_countries;

    #[test]
    fn test_capital_table() {
        let chn = capital("CHN").unwrap();
        assert_eq!((chn.lat, chn.lng), (39.9042, 116.4074));
        assert!(capital("AAA").is_none());
        assert_eq!(CAPITALS.len(), 20);
    }

    #[test]
    fn test_centroid_fallback() {
        let set = three_countries();
        // Closed square ring: the repeated vertex pulls the mean.
        let hub = resolve_hub("BBB", &set).unwrap();
        assert!((hub.lat - (-2.0)).abs() < 1e-9);
        assert!((hub.lng - 58.0).abs() < 1e-9);
        assert!(resolve_hub("ZZZ", &set).is_none());
        // Capitals resolve without geometry.
        assert!(resolve_hub("USA", &CountrySet::default()).is_some());
    }
}
